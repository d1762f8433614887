pub mod check_balance;
pub mod deploy;
pub mod fund;
pub mod network_info;
pub mod retrieve;
pub mod verify;
pub mod withdraw;
