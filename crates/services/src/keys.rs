//! Key names in the key-value store. One key per preference, plus the bank.

pub const MODE: &str = "qcm.mode";
pub const RANDOMIZE: &str = "qcm.randomize";
pub const TIMER: &str = "qcm.timer";
pub const TIMER_MINUTES: &str = "qcm.timerMin";
pub const CHAPTER: &str = "qcm.chapter";
pub const LEVEL: &str = "qcm.level";
pub const COUNT: &str = "qcm.count";
pub const BANK: &str = "qcm.bank";
