//! Diagnostic codes.
//!
//! Each code is a stable name grouped by the component that raises it
//! (`Lex*` for the tokenizer, `Misc*` for the driver itself). Used for
//! `quillc explain` lookups.
//!
//! All codes are declared in a single [`define_diagnostic_codes!`]
//! invocation. The macro generates: the `DiagnosticCode` enum, `ALL`,
//! `COUNT`, `as_str()`, `description()`, `Display`, and `FromStr`.

use std::fmt;
use std::str::FromStr;

/// Declare all diagnostic codes in a single location.
///
/// Each entry is `$variant, $description` where:
/// - `$variant` is the enum variant name (e.g., `MiscLoadFileFailed`)
/// - `$description` is a one-line summary string
macro_rules! define_diagnostic_codes {
    ($( $variant:ident, $desc:literal );+ $(;)?) => {
        /// Codes for all driver diagnostics.
        ///
        /// Prefix indicates the raising component:
        /// - `Lex*`: tokenizer
        /// - `Misc*`: driver (file loading, lifecycle, internal)
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum DiagnosticCode {
            $(
                #[doc = $desc]
                $variant,
            )+
        }

        impl DiagnosticCode {
            /// All code variants, for exhaustive iteration and testing.
            pub const ALL: &[DiagnosticCode] = &[ $( DiagnosticCode::$variant, )+ ];

            /// Number of code variants.
            pub const COUNT: usize = [ $( DiagnosticCode::$variant, )+ ].len();

            /// Get the code as a string (e.g., `"MiscLoadFileFailed"`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( DiagnosticCode::$variant => stringify!($variant), )+
                }
            }

            /// Get the one-line description of this code.
            pub fn description(&self) -> &'static str {
                match self {
                    $( DiagnosticCode::$variant => $desc, )+
                }
            }
        }

        impl FromStr for DiagnosticCode {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, UnknownCode> {
                match s {
                    $( stringify!($variant) => Ok(DiagnosticCode::$variant), )+
                    _ => Err(UnknownCode),
                }
            }
        }
    };
}

define_diagnostic_codes! {
    // Tokenizer
    LexUnterminatedString, "Unterminated string literal";
    LexInvalidCharacter, "Invalid character in source";
    LexInvalidIntLiteral, "Integer literal does not fit in 64 bits";
    LexInvalidFloatLiteral, "Malformed float literal";
    LexInvalidEscape, "Invalid escape sequence in string literal";
    LexFileTooLarge, "Source file exceeds the 4 GiB tokenizer limit";

    // Driver
    MiscFileDoesNotExist, "File passed to the driver does not exist";
    MiscLoadFileFailed, "Failed to open or read a file from disk";
    MiscHitMaxErrors, "Error budget exhausted; remaining work abandoned";
    MiscTrace, "Internal trace message";
    MiscDebug, "Internal debug message";
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized code name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode;

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown diagnostic code")
    }
}

impl std::error::Error for UnknownCode {}
