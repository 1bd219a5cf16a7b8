//! End-to-end scanner behavior over real buffers and partitionings

use heurscan::partition::builtin::{self, R_COMMENT, R_STRING};
use heurscan::scanner::is_blank;
use heurscan::{
    Bound, Config, Document, HeuristicScanner, LanguageRegistry, PartitionFilter, PeerPair, Region,
    RulePartitioner, TextBuffer, WholeDocument, UNBOUND,
};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

/// Positions made inert by a preceding `escape`
fn escaped_positions(text: &[char], escape: char) -> Vec<bool> {
    let mut escaped = vec![false; text.len()];
    let mut i = 0;
    while i < text.len() {
        if text[i] == escape {
            if let Some(next) = escaped.get_mut(i + 1) {
                *next = true;
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    escaped
}

/// Matching positions of `(` and `)`, computed with a stack
///
/// Positions flagged in `skip` take no part in matching.
fn reference_peers(text: &[char], skip: &[bool]) -> Vec<Option<usize>> {
    let mut peers = vec![None; text.len()];
    let mut open = Vec::new();
    for (i, &c) in text.iter().enumerate() {
        if skip[i] {
            continue;
        }
        match c {
            '(' => open.push(i),
            ')' => {
                if let Some(o) = open.pop() {
                    peers[o] = Some(i);
                    peers[i] = Some(o);
                }
            }
            _ => {}
        }
    }
    peers
}

#[test]
fn test_r_source_round_trip() {
    let source = "f <- function(x, y = \")\") {\n  # close ) here\n  g(x[[1]], '(')\n}\n";
    let buffer = TextBuffer::from(source);
    let r = builtin::r_language();
    let map = RulePartitioner::new(&r).partition(&buffer).unwrap();
    let mut scanner = HeuristicScanner::with_document(&map, &buffer, PartitionFilter::default_content());

    let chars: Vec<char> = source.chars().collect();
    let open_paren = chars.iter().position(|&c| c == '(').unwrap();
    let close = scanner.find_closing_peer(open_paren, PeerPair::PARENTHESES).unwrap();
    assert_eq!(chars[close], ')');
    assert_eq!(chars[close + 1], ' ');
    assert_eq!(chars[close + 2], '{');
    assert_eq!(scanner.find_opening_peer(close, PeerPair::PARENTHESES), Some(open_paren));

    let open_brace = close + 2;
    let close_brace = scanner.find_closing_peer(open_brace, PeerPair::BRACES).unwrap();
    assert_eq!(close_brace, chars.len() - 2);

    // Brackets in the comment and the strings are invisible to the scan
    let comment = map.of_type(R_COMMENT).next().unwrap();
    assert_eq!(scanner.count(comment.offset, comment.end(), ')'), 0);
    assert_eq!(map.of_type(R_STRING).count(), 2);
    assert_eq!(scanner.count(0, buffer.len(), '('), 2);
}

#[test]
fn test_rescan_after_edit() {
    let mut buffer = TextBuffer::from("x <- c(1, 2)\n");
    let r = builtin::r_language();
    let partitioner = RulePartitioner::new(&r);

    buffer.insert(7, "\"(\", ").unwrap();
    assert_eq!(buffer.text(), "x <- c(\"(\", 1, 2)\n");

    let map = partitioner.partition(&buffer).unwrap();
    let mut scanner = HeuristicScanner::with_document(&map, &buffer, PartitionFilter::default_content());
    assert_eq!(scanner.find_closing_peer(6, PeerPair::PARENTHESES), Some(16));

    // A map built before the edit no longer matches the buffer; scans fall
    // back to the placeholder partition and find nothing in code
    let mut stale_buffer = buffer.clone();
    stale_buffer.delete(0, 5).unwrap();
    let mut scanner = HeuristicScanner::with_document(&map, &stale_buffer, PartitionFilter::default_content());
    assert_eq!(scanner.find_closing_peer(1, PeerPair::PARENTHESES), None);
}

#[test]
fn test_directive_rule_stays_at_line_start() {
    let buffer = TextBuffer::from("/* x */ #define A(b) b\n#define B(c) c");
    let c = builtin::c_language();
    let map = RulePartitioner::new(&c).partition(&buffer).unwrap();
    let mut scanner = HeuristicScanner::with_document(&map, &buffer, PartitionFilter::default_content());

    // After the comment the directive text is plain code
    assert_eq!(scanner.find_closing_peer(17, PeerPair::PARENTHESES), Some(19));
    assert_eq!(map.of_type(builtin::C_PREPROCESSOR).count(), 1);
    assert_eq!(map.of_type(builtin::C_PREPROCESSOR).next().unwrap().offset, 23);
}

#[test]
fn test_registry_and_config_languages() {
    let config = Config::from_toml(
        r#"
[[language]]
name = "Ini"
extensions = ["ini"]

[[language.line]]
name = "comment"
pattern = ";.*$"
partition = "__ini_comment"
priority = 100
"#,
    )
    .unwrap();

    let mut registry = LanguageRegistry::new();
    for lang in config.languages {
        registry.add_language(lang);
    }
    let partitioner = registry.partitioner_for(std::path::Path::new("setup.ini")).unwrap();

    let buffer = TextBuffer::from("[a] ; [b]\nkey = [c]");
    let map = partitioner.partition(&buffer).unwrap();
    let mut scanner = HeuristicScanner::with_document(&map, &buffer, PartitionFilter::default_content());
    assert_eq!(scanner.scan_forward(1, UNBOUND, '['), Some(16));
    assert_eq!(scanner.scan_backward(15, UNBOUND, '['), Some(0));

    scanner.configure(&buffer, PartitionFilter::single("__ini_comment"));
    assert_eq!(scanner.scan_forward(0, UNBOUND, '['), Some(6));
}

#[test]
fn test_text_block_and_lines_with_crlf() {
    let buffer = TextBuffer::from("a\r\nbb\r\n\r\nccc");
    let classifier = WholeDocument::new();
    let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);

    let block = scanner.get_text_block(1, 5).unwrap();
    assert_eq!(block, Region::new(0, 7));
    assert_eq!(scanner.get_last_line_of_region(block).unwrap(), 1);
    assert!(scanner.is_blank_line(7).unwrap());
    assert_eq!(scanner.find_non_blank_forward(7, UNBOUND, true), Some(9));
    assert_eq!(scanner.find_common_word(10), Some(Region::new(9, 3)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn peers_match_stack_reference(text in "[()a \\\\\n]{0,48}") {
        let chars: Vec<char> = text.chars().collect();
        let escaped = escaped_positions(&chars, '\\');
        let plain = reference_peers(&chars, &vec![false; chars.len()]);
        let honoring_escapes = reference_peers(&chars, &escaped);
        let buffer = TextBuffer::from(text.as_str());
        let classifier = WholeDocument::new();
        let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);

        for (i, &c) in chars.iter().enumerate() {
            match c {
                '(' => {
                    prop_assert_eq!(scanner.find_closing_peer(i, PeerPair::PARENTHESES), plain[i]);
                    if !escaped[i] {
                        prop_assert_eq!(
                            scanner.find_closing_peer_escaped(i, PeerPair::PARENTHESES, '\\'),
                            honoring_escapes[i]
                        );
                    }
                }
                ')' => {
                    prop_assert_eq!(scanner.find_opening_peer(i, PeerPair::PARENTHESES), plain[i]);
                    if !escaped[i] {
                        prop_assert_eq!(
                            scanner.find_opening_peer_escaped(i, PeerPair::PARENTHESES, '\\'),
                            honoring_escapes[i]
                        );
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn peers_invert(text in "[()x]{0,48}") {
        let buffer = TextBuffer::from(text.as_str());
        let classifier = WholeDocument::new();
        let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);

        for (i, c) in text.chars().enumerate() {
            if c == '(' {
                if let Some(close) = scanner.find_closing_peer(i, PeerPair::PARENTHESES) {
                    prop_assert_eq!(scanner.find_opening_peer(close, PeerPair::PARENTHESES), Some(i));
                }
            }
        }
    }

    #[test]
    fn count_is_exact(text in "[,a\n ]{0,64}", start in 0usize..70, stop in 0usize..70) {
        let buffer = TextBuffer::from(text.as_str());
        let classifier = WholeDocument::new();
        let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);

        let len = buffer.len();
        let expected = text
            .chars()
            .enumerate()
            .filter(|&(i, c)| c == ',' && i >= start && i < stop.min(len))
            .count();
        prop_assert_eq!(scanner.count(start, stop, ','), expected);
    }

    #[test]
    fn blank_finders_skip_only_blanks(
        text in "[ \ta\n\u{00A0}]{1,40}",
        pos in 0usize..40,
        line_break_is_blank in any::<bool>(),
    ) {
        let chars: Vec<char> = text.chars().collect();
        let pos = pos % chars.len();
        let buffer = TextBuffer::from(text.as_str());
        let classifier = WholeDocument::new();
        let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);
        let skipped = |c: char| is_blank(c) || (line_break_is_blank && (c == '\n' || c == '\r'));

        let forward = scanner.find_non_blank_forward(pos, UNBOUND, line_break_is_blank);
        let end = forward.unwrap_or(chars.len());
        prop_assert!(chars[pos..end].iter().all(|&c| skipped(c)));
        if let Some(found) = forward {
            prop_assert!(!skipped(chars[found]));
        }

        let backward = scanner.find_non_blank_backward(pos, Bound::Unbound, line_break_is_blank);
        let start = backward.map_or(0, |b| b + 1);
        prop_assert!(chars[start..=pos].iter().all(|&c| skipped(c)));
        if let Some(found) = backward {
            prop_assert!(!skipped(chars[found]));
        }
    }

    #[test]
    fn queries_are_idempotent(text in "[a-z (){}\n]{0,40}", pos in 0usize..40) {
        let buffer = TextBuffer::from(text.as_str());
        let classifier = WholeDocument::new();
        let mut scanner = HeuristicScanner::with_document(&classifier, &buffer, PartitionFilter::Any);
        let pos = pos.min(buffer.len());

        let word = scanner.find_common_word(pos);
        prop_assert_eq!(scanner.find_common_word(pos), word);
        let blank = scanner.find_blank_region(pos, true);
        prop_assert_eq!(scanner.find_blank_region(pos, true), blank);
        let peer = scanner.find_closing_peer(pos, PeerPair::BRACES);
        prop_assert_eq!(scanner.find_closing_peer(pos, PeerPair::BRACES), peer);
        if let Some(region) = word {
            let text: Vec<char> = text.chars().collect();
            prop_assert!(text[region.offset..region.end()].iter().all(|c| c.is_alphanumeric()));
        }
    }
}
