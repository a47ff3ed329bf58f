use std::str::ParseBoolError;
use xdg::BaseDirectoriesError;

// Create the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        InvalidKey(key: String) {
            description("Error parsing config file")
            display("Invalid key '{}'", key)
        }

        InvalidLocale(locale: String) {
            description("Error interpreting system locale")
            display("Invalid locale '{}'", locale)
        }

        MissingRequiredEntryKey(required_key: String) {
            description("Error parsing Desktop Entry")
            display("Missing required entry key '{}'", required_key)
        }

        InvalidEntryType(entry_type: String) {
            description("Error parsing Desktop Entry")
            display("Invalid value '{}' for entry key 'Type'", entry_type)
        }

        InvalidBooleanValue(key: String, value: String) {
            description("Error parsing Desktop Entry")
            display("Invalid boolean value '{}' for entry key '{}'", value, key)
        }

        ConflictingShowIn {
            description("Error parsing Desktop Entry")
            display("Only one of either OnlyShowIn or NotShowIn may be specified")
        }

        UserDirsNotFound {
            description("User directories file not found")
            display("No 'user-dirs.dirs' found in config search path")
        }

        CommandFailed(cmd: String, status: Option<i32>) {
            description("External command failed")
            display("Command '{}' exited with status {:?}", cmd, status)
        }
    }
    foreign_links {
        InvalidValueFormat(ParseBoolError);
        XdgError(BaseDirectoriesError);
        Io(::std::io::Error);
        GlobPattern(::glob::PatternError);
    }
}

impl ErrorKind {
    /// Structurally invalid config file.
    pub fn is_format(&self) -> bool {
        match *self {
            ErrorKind::InvalidKey(_) => true,
            _ => false,
        }
    }

    /// Semantically invalid desktop entry.
    pub fn is_validation(&self) -> bool {
        match *self {
            ErrorKind::MissingRequiredEntryKey(_)
            | ErrorKind::InvalidEntryType(_)
            | ErrorKind::InvalidBooleanValue(..)
            | ErrorKind::ConflictingShowIn => true,
            _ => false,
        }
    }
}
