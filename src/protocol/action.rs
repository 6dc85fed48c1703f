//! Action Vocabulary
//!
//! The closed table of symbolic action names and their numeric wire codes.
//! Every protocol message carries one of these codes; the sentinel `255`
//! marks "no such action" and never appears in the table itself.

/// Wire code returned when a symbolic name is not in the table.
pub const UNKNOWN_CODE: u8 = 255;

/// A protocol action, paired 1:1 with a numeric wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Request could not be understood (code 0).
    UnknownRequest,
    /// Generic success notification (code 1).
    Success,
    /// Client requests authentication (code 10).
    Login,
    /// Authentication rejected (code 11).
    LoginFailure,
    /// Account already holds a live session (code 12).
    DuplicateLogin,
    /// Authentication accepted, carries the session token (code 13).
    LoginSuccessful,
    /// Client requests session termination (code 20).
    Logout,
    /// No live session to terminate (code 21).
    LogoutFailure,
    /// Session terminated (code 22).
    LogoutSuccessful,
    /// Client requests account creation (code 30).
    Register,
    /// Account created, carries the session token (code 31).
    RegisterSuccessful,
    /// Account creation rejected, carries the reason (code 32).
    RegisterFailure,
    /// Client requests a board resource (code 40).
    GetBoard,
    /// Board resource payload (code 41).
    Board,
}

impl Action {
    /// Every action in the table, in code order.
    pub const ALL: [Action; 14] = [
        Action::UnknownRequest,
        Action::Success,
        Action::Login,
        Action::LoginFailure,
        Action::DuplicateLogin,
        Action::LoginSuccessful,
        Action::Logout,
        Action::LogoutFailure,
        Action::LogoutSuccessful,
        Action::Register,
        Action::RegisterSuccessful,
        Action::RegisterFailure,
        Action::GetBoard,
        Action::Board,
    ];

    /// Numeric wire code for this action.
    pub fn code(self) -> u8 {
        match self {
            Action::UnknownRequest => 0,
            Action::Success => 1,
            Action::Login => 10,
            Action::LoginFailure => 11,
            Action::DuplicateLogin => 12,
            Action::LoginSuccessful => 13,
            Action::Logout => 20,
            Action::LogoutFailure => 21,
            Action::LogoutSuccessful => 22,
            Action::Register => 30,
            Action::RegisterSuccessful => 31,
            Action::RegisterFailure => 32,
            Action::GetBoard => 40,
            Action::Board => 41,
        }
    }

    /// Symbolic name for this action.
    pub fn name(self) -> &'static str {
        match self {
            Action::UnknownRequest => "unknown request",
            Action::Success => "success",
            Action::Login => "login",
            Action::LoginFailure => "login failure",
            Action::DuplicateLogin => "duplicate login",
            Action::LoginSuccessful => "login successful",
            Action::Logout => "logout",
            Action::LogoutFailure => "logout failure",
            Action::LogoutSuccessful => "logout successful",
            Action::Register => "register",
            Action::RegisterSuccessful => "register successful",
            Action::RegisterFailure => "register failure",
            Action::GetBoard => "get board",
            Action::Board => "board",
        }
    }

    /// Decode a wire code. `None` means "unrecognized action"; callers must
    /// treat that as an invalid request, never as a crash.
    pub fn from_code(code: u8) -> Option<Action> {
        match code {
            0 => Some(Action::UnknownRequest),
            1 => Some(Action::Success),
            10 => Some(Action::Login),
            11 => Some(Action::LoginFailure),
            12 => Some(Action::DuplicateLogin),
            13 => Some(Action::LoginSuccessful),
            20 => Some(Action::Logout),
            21 => Some(Action::LogoutFailure),
            22 => Some(Action::LogoutSuccessful),
            30 => Some(Action::Register),
            31 => Some(Action::RegisterSuccessful),
            32 => Some(Action::RegisterFailure),
            40 => Some(Action::GetBoard),
            41 => Some(Action::Board),
            _ => None,
        }
    }

    /// Look up an action by its symbolic name.
    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|a| a.name() == name)
    }

    /// Wire code for a symbolic name, or [`UNKNOWN_CODE`] if the name is not
    /// in the table.
    pub fn code_of(name: &str) -> u8 {
        Action::from_name(name).map_or(UNKNOWN_CODE, Action::code)
    }

    /// Server-authored payload for codes whose reply text is fixed by the
    /// protocol rather than the caller. Centralized here so failure text
    /// stays identical across handlers.
    pub fn default_content(code: u8) -> Option<Vec<String>> {
        match code {
            0 => Some(Vec::new()),
            11 => Some(vec!["Invalid username or password.".to_string()]),
            12 => Some(vec!["Already logged in.".to_string()]),
            20 | 21 => Some(Vec::new()),
            _ => None,
        }
    }

    /// Whether replies for this action ignore caller-supplied content in
    /// favor of [`Action::default_content`].
    pub fn uses_default_content(self) -> bool {
        matches!(
            self,
            Action::LoginFailure
                | Action::DuplicateLogin
                | Action::Logout
                | Action::LogoutFailure
                | Action::LogoutSuccessful
        )
    }
}
