//! Session metadata: derivation from the document root and the per-document cache.
//!
//! All speeches of one protocol share the session described by the root
//! element's attributes. [`SessionContext`] derives it once and hands the same
//! `Arc` to every speech of the document, re-deriving only when it is shown a
//! root with a different [`Fingerprint`].

use chrono::{NaiveDate, NaiveTime};
use plenum_graph::Session;
use std::sync::Arc;

use crate::schema::{
    ATTR_ELECTION_PERIOD, ATTR_SESSION_DATE, ATTR_SESSION_END, ATTR_SESSION_LOCATION,
    ATTR_SESSION_NUMBER, ATTR_SESSION_START, DATE_FORMAT, TIME_FORMAT,
};
use crate::tree::Element;

/// Identity of a document's session for caching purposes.
///
/// FNV-1a 64 over `"<wahlperiode>|<sitzung-nr>|<sitzung-datum>"`. This is not
/// a security primitive; two roots with the same three attributes are the same
/// session as far as the cache is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(root: Element<'_>) -> Self {
        let key = format!(
            "{}|{}|{}",
            root.attr_or_empty(ATTR_ELECTION_PERIOD),
            root.attr_or_empty(ATTR_SESSION_NUMBER),
            root.attr_or_empty(ATTR_SESSION_DATE),
        );
        Self(fnv1a64(key.as_bytes()))
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Derive the session from the root element's attributes.
///
/// Returns `None` when the election period or session number is missing.
/// Unparsable dates and times only blank the affected field.
pub fn parse_session(root: Element<'_>) -> Option<Session> {
    let election_period = root.attr_or_empty(ATTR_ELECTION_PERIOD).trim();
    let number = root.attr_or_empty(ATTR_SESSION_NUMBER).trim();
    if election_period.is_empty() || number.is_empty() {
        return None;
    }

    let location = root
        .attr(ATTR_SESSION_LOCATION)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some(Session {
        election_period: election_period.to_string(),
        number: number.to_string(),
        location,
        date: parse_date(root.attr(ATTR_SESSION_DATE)),
        start_time: parse_time(root.attr(ATTR_SESSION_START)),
        end_time: parse_time(root.attr(ATTR_SESSION_END)),
    })
}

/// `dd.mm.yyyy`; absent or blank input is `None` without a diagnostic.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(value = raw, error = %err, "unparsable session date");
            None
        }
    }
}

/// 24-hour `H:MM`; absent or blank input is `None` without a diagnostic.
pub fn parse_time(raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveTime::parse_from_str(raw, TIME_FORMAT) {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::warn!(value = raw, error = %err, "unparsable session time");
            None
        }
    }
}

/// Per-document session cache.
#[derive(Debug, Default)]
pub struct SessionContext {
    cached: Option<(Fingerprint, Arc<Session>)>,
    derivations: usize,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached session for `root`, deriving it first when the cache
    /// is empty or was filled from a root with a different fingerprint.
    pub fn get_or_parse(&mut self, root: Element<'_>) -> Option<Arc<Session>> {
        let fingerprint = Fingerprint::of(root);
        if let Some((cached_fp, session)) = &self.cached {
            if *cached_fp == fingerprint {
                return Some(Arc::clone(session));
            }
        }

        self.derivations += 1;
        match parse_session(root) {
            Some(session) => {
                let session = Arc::new(session);
                self.cached = Some((fingerprint, Arc::clone(&session)));
                Some(session)
            }
            None => {
                self.cached = None;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.cached = None;
    }

    /// Fingerprint of the cached session, if any.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.cached.as_ref().map(|(fp, _)| *fp)
    }

    /// How many times a session was derived from a root element.
    pub fn derivations(&self) -> usize {
        self.derivations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::XmlTree;

    fn root_xml(period: &str, number: &str, date: &str, start: &str) -> String {
        format!(
            r#"<dbtplenarprotokoll wahlperiode="{period}" sitzung-nr="{number}" sitzung-datum="{date}" sitzung-start-uhrzeit="{start}" sitzung-ende-uhrzeit="17:58" sitzung-ort="Berlin"/>"#
        )
    }

    #[test]
    fn derives_all_fields() {
        let tree = XmlTree::parse(&root_xml("20", "1", "26.10.2021", "11:00")).unwrap();
        let session = parse_session(tree.root()).unwrap();

        assert_eq!(session.election_period, "20");
        assert_eq!(session.number, "1");
        assert_eq!(session.location.as_deref(), Some("Berlin"));
        assert_eq!(session.date, NaiveDate::from_ymd_opt(2021, 10, 26));
        assert_eq!(session.start_time, NaiveTime::from_hms_opt(11, 0, 0));
        assert_eq!(session.end_time, NaiveTime::from_hms_opt(17, 58, 0));
    }

    #[test]
    fn bad_fields_degrade_to_none() {
        let tree = XmlTree::parse(&root_xml("20", "2", "2021-10-26", "25:99")).unwrap();
        let session = parse_session(tree.root()).unwrap();

        assert_eq!(session.date, None);
        assert_eq!(session.start_time, None);
        // The end time is parsed on its own.
        assert_eq!(session.end_time, NaiveTime::from_hms_opt(17, 58, 0));
    }

    #[test]
    fn single_digit_hour() {
        assert_eq!(parse_time(Some("9:05")), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time(Some("")), None);
        assert_eq!(parse_time(None), None);
    }

    #[test]
    fn missing_identity_yields_no_session() {
        let tree = XmlTree::parse(r#"<dbtplenarprotokoll wahlperiode="20"/>"#).unwrap();
        assert!(parse_session(tree.root()).is_none());

        let mut ctx = SessionContext::new();
        assert!(ctx.get_or_parse(tree.root()).is_none());
        assert!(ctx.fingerprint().is_none());
    }

    #[test]
    fn caches_per_fingerprint() {
        let first = XmlTree::parse(&root_xml("20", "1", "26.10.2021", "11:00")).unwrap();
        let mut ctx = SessionContext::new();

        let a = ctx.get_or_parse(first.root()).unwrap();
        for _ in 0..4 {
            let again = ctx.get_or_parse(first.root()).unwrap();
            assert!(Arc::ptr_eq(&a, &again));
        }
        assert_eq!(ctx.derivations(), 1);

        ctx.reset();
        assert!(ctx.fingerprint().is_none());

        let second = XmlTree::parse(&root_xml("20", "2", "27.10.2021", "9:00")).unwrap();
        let b = ctx.get_or_parse(second.root()).unwrap();
        assert_ne!(*a, *b);
        assert_eq!(ctx.derivations(), 2);
    }

    #[test]
    fn same_identity_reuses_cached_times() {
        // Only period, number and date identify a session; other attributes are
        // not re-read while the fingerprint matches.
        let first = XmlTree::parse(&root_xml("20", "1", "26.10.2021", "11:00")).unwrap();
        let second = XmlTree::parse(&root_xml("20", "1", "26.10.2021", "12:30")).unwrap();
        assert_eq!(Fingerprint::of(first.root()), Fingerprint::of(second.root()));

        let mut ctx = SessionContext::new();
        ctx.get_or_parse(first.root());
        let session = ctx.get_or_parse(second.root()).unwrap();
        assert_eq!(session.start_time, NaiveTime::from_hms_opt(11, 0, 0));
        assert_eq!(ctx.derivations(), 1);
    }
}
