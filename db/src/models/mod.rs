pub mod advisor_specialty;
pub mod conversation;
pub mod message;
pub mod review;
pub mod session;
pub mod specialty;
pub mod transaction;
pub mod user;

pub use advisor_specialty::Entity as AdvisorSpecialty;
pub use conversation::Entity as Conversation;
pub use message::Entity as Message;
pub use review::Entity as Review;
pub use session::Entity as Session;
pub use specialty::Entity as Specialty;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;
