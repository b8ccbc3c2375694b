pub use registration::{HashParseError, HmacSha256, RegistrationHash};
pub use voter_core::{VoterDetails, VoterRecord, VoterState, VoterStatus};

mod registration;
mod voter_core;
