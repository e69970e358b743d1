//! Vocabulary of the plenary protocol XML schema (`dbtplenarprotokoll`).
//!
//! Keeping element and attribute names in one place avoids drift between the
//! parser, the loader and the test fixtures.

// -----------------------------------------------------------------------------
// Root element attributes (session metadata)
// -----------------------------------------------------------------------------

pub const ATTR_ELECTION_PERIOD: &str = "wahlperiode";
pub const ATTR_SESSION_NUMBER: &str = "sitzung-nr";
pub const ATTR_SESSION_LOCATION: &str = "sitzung-ort";
pub const ATTR_SESSION_DATE: &str = "sitzung-datum";
pub const ATTR_SESSION_START: &str = "sitzung-start-uhrzeit";
pub const ATTR_SESSION_END: &str = "sitzung-ende-uhrzeit";

/// `dd.mm.yyyy`
pub const DATE_FORMAT: &str = "%d.%m.%Y";
/// 24-hour `H:MM`
pub const TIME_FORMAT: &str = "%H:%M";

// -----------------------------------------------------------------------------
// Proceedings
// -----------------------------------------------------------------------------

pub const TAG_PROCEEDINGS: &str = "sitzungsverlauf";
pub const TAG_SPEECH: &str = "rede";
pub const TAG_COMMENT: &str = "kommentar";
pub const TAG_PARAGRAPH: &str = "p";

/// Paragraph role attribute (`<p klasse="redner">`).
pub const ATTR_ROLE: &str = "klasse";
/// Shared `id` attribute of speeches and speakers.
pub const ATTR_ID: &str = "id";

pub const ROLE_SPEAKER: &str = "redner";
pub const ROLE_COMMENT: &str = "kommentar";

// -----------------------------------------------------------------------------
// Speaker record
// -----------------------------------------------------------------------------

pub const TAG_SPEAKER: &str = "redner";
pub const TAG_NAME: &str = "name";
pub const TAG_TITLE: &str = "titel";
pub const TAG_FIRST_NAME: &str = "vorname";
pub const TAG_LAST_NAME: &str = "nachname";
pub const TAG_GROUP: &str = "fraktion";
