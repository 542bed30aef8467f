//! Annotated-content tokenizer.
//!
//! The knowledge engine tags structure mentions with `[[Name]]` inside
//! otherwise free prose. Tokenization happens in two passes:
//!
//! 1. `split_refs` cuts the raw text into plain runs and complete
//!    `[[...]]` references. Unbalanced delimiters never match and fall
//!    through to the plain run untouched, so re-concatenating the raw
//!    segments reproduces the input exactly.
//! 2. `expand_blocks` applies the fixed five-rule block policy to each
//!    plain run: `# `, `## `, `### ` headings, a single digit followed by
//!    `. ` as a numbered step, and newlines as line breaks. Nothing else;
//!    this is deliberately not a markdown implementation.

/// Output of the delimiter pass. Lossless with respect to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSegment {
    Plain(String),
    /// The text between a complete `[[` `]]` pair, verbatim.
    Reference(String),
}

/// A plain run after block expansion. One `Block` per input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading1(String),
    Heading2(String),
    Heading3(String),
    Step(String),
    /// Unstructured line; empty string preserves a blank line.
    Text(String),
}

/// Display token handed to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Blocks(Vec<Block>),
    /// Interactive structure token: hover classifies the name into a region
    /// highlight, click starts a structure-detail fetch.
    StructureRef(String),
}

/// Split content into plain runs and complete `[[name]]` references.
///
/// A reference never crosses a newline; a `[[` with no closing `]]` on the
/// same logical stretch stays literal text.
pub fn split_refs(content: &str) -> Vec<RawSegment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut search_from = 0;

    while let Some(open_rel) = content[search_from..].find("[[") {
        let open = search_from + open_rel;
        let body = &content[open + 2..];
        match body.find("]]") {
            Some(close_rel) if !body[..close_rel].contains('\n') => {
                if open > plain_start {
                    segments.push(RawSegment::Plain(content[plain_start..open].to_string()));
                }
                segments.push(RawSegment::Reference(body[..close_rel].to_string()));
                plain_start = open + 2 + close_rel + 2;
                search_from = plain_start;
            }
            _ => {
                // No usable close for this opener; it stays literal and the
                // scan resumes one byte later (an overlapping `[[` may still
                // pair up).
                search_from = open + 1;
            }
        }
    }

    if plain_start < content.len() {
        segments.push(RawSegment::Plain(content[plain_start..].to_string()));
    }
    segments
}

/// Re-assemble raw segments into the original text.
pub fn reconstruct(segments: &[RawSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            RawSegment::Plain(text) => out.push_str(text),
            RawSegment::Reference(name) => {
                out.push_str("[[");
                out.push_str(name);
                out.push_str("]]");
            }
        }
    }
    out
}

/// Expand a plain run into blocks, one per line.
pub fn expand_blocks(plain: &str) -> Vec<Block> {
    plain
        .split('\n')
        .map(|line| {
            if let Some(rest) = line.strip_prefix("### ") {
                Block::Heading3(rest.to_string())
            } else if let Some(rest) = line.strip_prefix("## ") {
                Block::Heading2(rest.to_string())
            } else if let Some(rest) = line.strip_prefix("# ") {
                Block::Heading1(rest.to_string())
            } else if is_step_line(line) {
                Block::Step(line[3..].to_string())
            } else {
                Block::Text(line.to_string())
            }
        })
        .collect()
}

// A step line is exactly one digit, a period, a space.
fn is_step_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(d), Some('.'), Some(' ')) if d.is_ascii_digit()
    )
}

/// Full tokenization: delimiter pass, then block expansion of plain runs.
pub fn tokenize(content: &str) -> Vec<Segment> {
    split_refs(content)
        .into_iter()
        .map(|raw| match raw {
            RawSegment::Plain(text) => Segment::Blocks(expand_blocks(&text)),
            RawSegment::Reference(name) => Segment::StructureRef(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(segments: &[RawSegment]) -> Vec<&str> {
        segments
            .iter()
            .filter_map(|s| match s {
                RawSegment::Reference(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn splits_two_references() {
        let content = "Lesión en [[Núcleo Rojo]] y [[Fascículo Longitudinal Medial]]";
        let segments = split_refs(content);
        assert_eq!(refs(&segments), vec!["Núcleo Rojo", "Fascículo Longitudinal Medial"]);
        assert_eq!(
            segments[0],
            RawSegment::Plain("Lesión en ".to_string())
        );
        assert_eq!(segments[2], RawSegment::Plain(" y ".to_string()));
        assert_eq!(reconstruct(&segments), content);
    }

    #[test]
    fn unbalanced_open_stays_literal() {
        let content = "daño en [[Tálamo sin cierre";
        let segments = split_refs(content);
        assert_eq!(segments, vec![RawSegment::Plain(content.to_string())]);
    }

    #[test]
    fn reference_does_not_cross_newlines() {
        let content = "ver [[Tálamo\n]] y [[Puente]]";
        let segments = split_refs(content);
        assert_eq!(refs(&segments), vec!["Puente"]);
        assert_eq!(reconstruct(&segments), content);
    }

    #[test]
    fn lone_close_is_plain_text() {
        let content = "sin apertura ]] aquí";
        assert_eq!(split_refs(content), vec![RawSegment::Plain(content.to_string())]);
    }

    #[test]
    fn adjacent_references_produce_no_empty_plains() {
        let segments = split_refs("[[A]][[B]]");
        assert_eq!(
            segments,
            vec![
                RawSegment::Reference("A".to_string()),
                RawSegment::Reference("B".to_string())
            ]
        );
    }

    #[test]
    fn reconstruction_is_lossless_on_awkward_inputs() {
        for content in [
            "",
            "solo prosa",
            "[[",
            "]]",
            "[[]]",
            "a [[b]] c [[d",
            "[[[Anidado]]",
            "línea\n# título\n[[Bulbo]]",
        ] {
            assert_eq!(reconstruct(&split_refs(content)), content);
        }
    }

    #[test]
    fn heading_and_step_expansion() {
        let blocks = expand_blocks("# Protocolo\n## Vías\n### Detalle\n1. Primer paso\ntexto\n\nfin");
        assert_eq!(
            blocks,
            vec![
                Block::Heading1("Protocolo".to_string()),
                Block::Heading2("Vías".to_string()),
                Block::Heading3("Detalle".to_string()),
                Block::Step("Primer paso".to_string()),
                Block::Text("texto".to_string()),
                Block::Text(String::new()),
                Block::Text("fin".to_string()),
            ]
        );
    }

    #[test]
    fn step_requires_single_digit_prefix() {
        assert_eq!(expand_blocks("10. no es paso"), vec![Block::Text("10. no es paso".to_string())]);
        assert_eq!(expand_blocks("2. sí es paso"), vec![Block::Step("sí es paso".to_string())]);
    }

    #[test]
    fn no_other_markdown_is_recognized() {
        let blocks = expand_blocks("- item\n**negrita**\n`código`");
        assert!(blocks.iter().all(|b| matches!(b, Block::Text(_))));
    }

    #[test]
    fn tokenize_interleaves_blocks_and_refs() {
        let segments = tokenize("## Correlación\nLa vía pasa por [[Puente]].");
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[1], Segment::StructureRef(n) if n == "Puente"));
        match &segments[0] {
            Segment::Blocks(blocks) => {
                assert_eq!(blocks[0], Block::Heading2("Correlación".to_string()));
            }
            other => panic!("expected blocks, got {:?}", other),
        }
    }
}
