//! Built-in resource kinds

mod integer;
mod password;
mod shuffle;
mod string;
mod string_like;

pub use integer::{IntegerInputs, IntegerPlan, RandomInteger};
pub use password::{PasswordPlan, RandomPassword};
pub use shuffle::{RandomShuffle, ShuffleInputs, ShufflePlan, MAX_RESULT_COUNT};
pub use string::{RandomString, StringPlan};
pub use string_like::StringInputs;
