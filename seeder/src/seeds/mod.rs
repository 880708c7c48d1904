pub mod admin;
pub mod advisor;
pub mod conversation;
pub mod message;
pub mod review;
pub mod session;
pub mod specialty;
pub mod topup;
pub mod user;
