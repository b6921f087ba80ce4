//! 거래 백엔드 커넥터.

pub mod fxcm;
