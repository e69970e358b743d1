//! Speech extraction from a `rede` element.
//!
//! The parser produces [`ParsedSpeech`] records that still carry source keys
//! and names. Deduplication against the corpus happens in the loader.

use plenum_graph::Session;
use std::sync::Arc;

use crate::normalize::normalize_group;
use crate::schema::{
    ATTR_ID, ATTR_ROLE, ROLE_COMMENT, ROLE_SPEAKER, TAG_COMMENT, TAG_FIRST_NAME, TAG_GROUP,
    TAG_LAST_NAME, TAG_NAME, TAG_PARAGRAPH, TAG_SPEAKER, TAG_TITLE,
};
use crate::session::{parse_session, SessionContext};
use crate::tree::Element;

// ============================================================================
// Parsed records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSpeaker {
    pub key: String,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Canonical group name, `None` when the record declares no `fraktion`.
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSpeech {
    pub key: String,
    pub speaker: Option<ParsedSpeaker>,
    pub session: Option<Arc<Session>>,
    pub text: String,
    /// Comment texts, nested first, then trailing siblings. Speaker and group
    /// are attached by the corpus from the canonical speaker record.
    pub comments: Vec<String>,
}

impl ParsedSpeech {
    /// Only complete records are admitted to the corpus.
    pub fn is_complete(&self) -> bool {
        self.speaker.is_some() && self.session.is_some()
    }
}

// ============================================================================
// Speaker
// ============================================================================

/// Read a `redner` element.
///
/// Returns `None` when the element has no `id` attribute or no `name` child.
pub fn parse_speaker(redner: Element<'_>) -> Option<ParsedSpeaker> {
    let key = redner
        .attr(ATTR_ID)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let name = redner.first_descendant(TAG_NAME)?;

    let field = |tag: &str| name.first_descendant(tag).map(|e| e.text().trim().to_string());

    let title = field(TAG_TITLE).filter(|t| !t.is_empty());
    let group = name
        .first_descendant(TAG_GROUP)
        .map(|e| normalize_group(Some(e.text().as_str())));

    Some(ParsedSpeaker {
        key: key.to_string(),
        title,
        first_name: field(TAG_FIRST_NAME).unwrap_or_default(),
        last_name: field(TAG_LAST_NAME).unwrap_or_default(),
        group,
    })
}

/// Locate and parse the speaker of a speech.
///
/// A direct `redner` child takes precedence; otherwise the first direct
/// `<p klasse="redner">` child holding a `redner` element is used.
pub fn find_speaker(rede: Element<'_>) -> Option<ParsedSpeaker> {
    if let Some(redner) = rede.child(TAG_SPEAKER) {
        return parse_speaker(redner);
    }

    rede.children()
        .filter(|p| p.is(TAG_PARAGRAPH) && p.attr(ATTR_ROLE) == Some(ROLE_SPEAKER))
        .find_map(|p| p.first_descendant(TAG_SPEAKER))
        .and_then(parse_speaker)
}

// ============================================================================
// Body and comments
// ============================================================================

fn is_speaker_or_comment(element: Element<'_>) -> bool {
    if element.is(TAG_SPEAKER) || element.is(TAG_COMMENT) {
        return true;
    }
    matches!(element.attr(ATTR_ROLE), Some(ROLE_SPEAKER) | Some(ROLE_COMMENT))
}

/// Speech body: trimmed text of the direct children that are neither speaker
/// markup nor comments, joined by single spaces.
pub fn extract_text(rede: Element<'_>) -> String {
    let pieces: Vec<String> = rede
        .children()
        .filter(|child| !is_speaker_or_comment(*child))
        .map(|child| child.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    pieces.join(" ")
}

/// Texts of all `kommentar` elements inside the speech, in document order.
pub fn nested_comments(rede: Element<'_>) -> Vec<String> {
    rede.descendants_named(TAG_COMMENT)
        .map(|c| c.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Texts of the `kommentar` siblings directly following the speech. The scan
/// ends at the first sibling of any other kind.
pub fn trailing_comments(rede: Element<'_>) -> Vec<String> {
    rede.following_siblings()
        .take_while(|sibling| sibling.is(TAG_COMMENT))
        .map(|c| c.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse one speech, taking the session from `ctx`.
pub fn parse_speech(rede: Element<'_>, root: Element<'_>, ctx: &mut SessionContext) -> ParsedSpeech {
    let session = ctx.get_or_parse(root);
    build_speech(rede, session)
}

/// Parse one speech, deriving the session from `root` afresh.
pub fn parse_speech_uncached(rede: Element<'_>, root: Element<'_>) -> ParsedSpeech {
    let session = parse_session(root).map(Arc::new);
    build_speech(rede, session)
}

fn build_speech(rede: Element<'_>, session: Option<Arc<Session>>) -> ParsedSpeech {
    let key = rede.attr_or_empty(ATTR_ID).trim().to_string();
    let speaker = find_speaker(rede);
    let text = extract_text(rede);

    let mut comments = nested_comments(rede);
    comments.extend(trailing_comments(rede));

    if speaker.is_none() {
        tracing::debug!(speech = %key, "speech without identifiable speaker");
    }

    ParsedSpeech {
        key,
        speaker,
        session,
        text,
        comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::XmlTree;

    const DOC: &str = r#"<dbtplenarprotokoll wahlperiode="20" sitzung-nr="7" sitzung-datum="15.12.2021" sitzung-start-uhrzeit="9:00" sitzung-ende-uhrzeit="18:30">
  <sitzungsverlauf>
    <tagesordnungspunkt>
      <rede id="ID2000701">
        <p klasse="redner"><redner id="11004000"><name><titel>Dr.</titel><vorname>Erika</vorname><nachname>Muster</nachname><fraktion>SPD</fraktion></name></redner>Erika Muster (SPD):</p>
        <p klasse="J_1">Sehr geehrte Frau Präsidentin!</p>
        <kommentar>(Beifall bei der SPD)</kommentar>
        <p klasse="J">Vielen Dank.</p>
      </rede>
      <kommentar>(Beifall bei der SPD)</kommentar>
      <kommentar>   </kommentar>
      <kommentar>(Zuruf von der AfD)</kommentar>
      <p klasse="T_NaS">Zwischenbemerkung</p>
      <kommentar>(Heiterkeit)</kommentar>
      <rede id="ID2000702">
        <redner id="11004001"><name><vorname>Max</vorname><nachname>Beispiel</nachname></name></redner>
        <p klasse="J">Ohne Fraktion.</p>
      </rede>
      <rede id="ID2000703">
        <p klasse="J">Niemand spricht.</p>
      </rede>
    </tagesordnungspunkt>
  </sitzungsverlauf>
</dbtplenarprotokoll>"#;

    fn speech<'a>(tree: &'a XmlTree, id: &str) -> Element<'a> {
        tree.root()
            .descendants_named("rede")
            .find(|r| r.attr("id") == Some(id))
            .unwrap()
    }

    #[test]
    fn speaker_inside_speaker_paragraph() {
        let tree = XmlTree::parse(DOC).unwrap();
        let speaker = find_speaker(speech(&tree, "ID2000701")).unwrap();

        assert_eq!(speaker.key, "11004000");
        assert_eq!(speaker.title.as_deref(), Some("Dr."));
        assert_eq!(speaker.first_name, "Erika");
        assert_eq!(speaker.last_name, "Muster");
        assert_eq!(speaker.group.as_deref(), Some("SPD"));
    }

    #[test]
    fn speaker_without_group_declares_none() {
        let tree = XmlTree::parse(DOC).unwrap();
        let speaker = find_speaker(speech(&tree, "ID2000702")).unwrap();
        assert_eq!(speaker.key, "11004001");
        assert_eq!(speaker.title, None);
        assert_eq!(speaker.group, None);
    }

    #[test]
    fn speaker_paragraph_must_be_a_direct_child() {
        let tree = XmlTree::parse(
            r#"<rede id="ID1"><div><p klasse="redner"><redner id="9"><name><vorname>A</vorname><nachname>B</nachname></name></redner></p></div><p klasse="J">Text.</p></rede>"#,
        )
        .unwrap();
        assert!(find_speaker(tree.root()).is_none());
    }

    #[test]
    fn speaker_requires_id_and_name() {
        let tree =
            XmlTree::parse(r#"<r><redner><name><vorname>A</vorname></name></redner><redner id="1"/></r>"#)
                .unwrap();
        let mut speakers = tree.root().children();
        assert!(parse_speaker(speakers.next().unwrap()).is_none());
        assert!(parse_speaker(speakers.next().unwrap()).is_none());
    }

    #[test]
    fn body_skips_speaker_and_comment_markup() {
        let tree = XmlTree::parse(DOC).unwrap();
        assert_eq!(
            extract_text(speech(&tree, "ID2000701")),
            "Sehr geehrte Frau Präsidentin! Vielen Dank."
        );
        assert_eq!(extract_text(speech(&tree, "ID2000702")), "Ohne Fraktion.");
    }

    #[test]
    fn nested_then_contiguous_trailing_comments() {
        let tree = XmlTree::parse(DOC).unwrap();
        let mut ctx = SessionContext::new();
        let parsed = parse_speech(speech(&tree, "ID2000701"), tree.root(), &mut ctx);

        // The blank sibling is skipped; "(Heiterkeit)" follows an intervening
        // paragraph and does not belong to the speech.
        assert_eq!(
            parsed.comments,
            vec!["(Beifall bei der SPD)", "(Beifall bei der SPD)", "(Zuruf von der AfD)"]
        );
    }

    #[test]
    fn trailing_scan_stops_at_next_speech() {
        let tree = XmlTree::parse(DOC).unwrap();
        assert!(trailing_comments(speech(&tree, "ID2000702")).is_empty());
        assert!(trailing_comments(speech(&tree, "ID2000703")).is_empty());
    }

    #[test]
    fn speech_without_speaker_is_incomplete() {
        let tree = XmlTree::parse(DOC).unwrap();
        let parsed = parse_speech_uncached(speech(&tree, "ID2000703"), tree.root());

        assert_eq!(parsed.key, "ID2000703");
        assert!(parsed.speaker.is_none());
        assert!(parsed.session.is_some());
        assert!(!parsed.is_complete());
        assert_eq!(parsed.text, "Niemand spricht.");
    }

    #[test]
    fn speeches_of_one_document_share_the_session() {
        let tree = XmlTree::parse(DOC).unwrap();
        let mut ctx = SessionContext::new();
        let sessions: Vec<Arc<Session>> = tree
            .root()
            .descendants_named("rede")
            .map(|rede| parse_speech(rede, tree.root(), &mut ctx).session.unwrap())
            .collect();

        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
        assert_eq!(ctx.derivations(), 1);
        assert_eq!(sessions[0].key(), "20_7");
    }
}
