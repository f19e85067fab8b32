//! Wait/notify latency prober: times how long a waiter takes to observe a
//! flag flip signalled through the Linux futex syscall. Linux only.

pub mod cli;
pub mod futex;
pub mod probe;
pub mod report;
