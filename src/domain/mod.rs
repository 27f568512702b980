pub mod staking;
