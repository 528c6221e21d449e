//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args, no config found)              |
//! | 3    | Config file invalid                                      |
//! | 4    | Source table unreadable                                  |
//! | 5    | Source table schema mismatch                             |
//! | 6    | Composer mapped to conflicting countries (reject policy) |
//! | 7    | Incomplete reconciliation (`--strict`)                   |
//! | 8    | Output could not be written                              |

use scorelit_recon::{ErrorKind, ReconError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, no config file found.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be read, parsed, or validated.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// A source table could not be read.
pub const EXIT_DATA_UNAVAILABLE: u8 = 4;

/// A source table lacks an expected column or holds an unreadable value.
pub const EXIT_SCHEMA_MISMATCH: u8 = 5;

/// A composer maps to more than one country and the policy is `reject`.
pub const EXIT_AMBIGUOUS_MAPPING: u8 = 6;

/// `--strict` run left unmatched composers or unlocated countries.
pub const EXIT_INCOMPLETE: u8 = 7;

/// Writing the JSON output file failed.
pub const EXIT_OUTPUT: u8 = 8;

/// Map an engine/loader error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err.kind() {
        ErrorKind::DataUnavailable => EXIT_DATA_UNAVAILABLE,
        ErrorKind::SchemaMismatch => EXIT_SCHEMA_MISMATCH,
        ErrorKind::AmbiguousMapping => EXIT_AMBIGUOUS_MAPPING,
        ErrorKind::Config => EXIT_CONFIG_INVALID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorelit_recon::TableKind;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CONFIG_INVALID,
            EXIT_DATA_UNAVAILABLE,
            EXIT_SCHEMA_MISMATCH,
            EXIT_AMBIGUOUS_MAPPING,
            EXIT_INCOMPLETE,
            EXIT_OUTPUT,
        ];
        let unique: std::collections::HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn error_kinds_map_to_codes() {
        let err = ReconError::missing_column(TableKind::Performances, "Composer");
        assert_eq!(recon_exit_code(&err), EXIT_SCHEMA_MISMATCH);
        let err = ReconError::ConfigParse("bad".into());
        assert_eq!(recon_exit_code(&err), EXIT_CONFIG_INVALID);
    }
}
