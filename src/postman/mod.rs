pub mod client;
pub mod publisher;

pub use client::{PostmanClient, RemoteCollection};
pub use publisher::{PublishAction, Publisher};
