pub mod staking_service;
