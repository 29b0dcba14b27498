pub mod cam4;
