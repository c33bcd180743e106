//! The `milciv` command-line front end.
//!
//! | Subcommand    | Output                                                    |
//! |---------------|-----------------------------------------------------------|
//! | `compare`     | RMC, civilian take-home, monthly delta, N-year projection |
//! | `vesting`     | Risk-adjusted vesting schedule, optional grant comparison |
//! | `parse-offer` | Terms extracted from offer text, optional take-home       |
//! | `stations`    | Duty stations with housing rates                          |

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod report;
