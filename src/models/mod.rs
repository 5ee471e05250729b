pub mod contact;
pub mod filter;
pub mod inquiry;
pub mod session;
pub mod tour;
