use std::time::Duration;

use crate::Result;
use crate::http::types::Status;

pub struct Response {
    pub status: Status,
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl Response {
    pub fn new(status: u16, body: Vec<u8>, duration: Duration) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            body,
            duration,
        })
    }

    /// 响应体字节数
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}
