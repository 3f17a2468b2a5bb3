use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use unicode_ident::is_xid_continue;

use crate::encoding::Encoding;
use crate::errors::{PatternError, PatternErrorKind, PatternResult};

use super::parser::parse_component_pattern;
use super::parts::{Modifier, PartKind};

pub type GroupNames = SmallVec<[String; 4]>;

/// One compiled component: the canonical pattern string returned by the
/// accessors, the anchored matcher, and the capture-name table.
#[derive(Debug, Clone)]
pub struct Component {
    pub pattern: String,
    pub regex: Regex,
    pub group_names: GroupNames,
}

const REGEX_ESCAPE_SET: &str = ".+*?^${}()[]|/\\";
const PATTERN_ESCAPE_SET: &str = "+*?:{}()\\";

fn escape_regex_into(input: &str, out: &mut String) {
    for c in input.chars() {
        if REGEX_ESCAPE_SET.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
}

fn escape_pattern_into(input: &str, out: &mut String) {
    for c in input.chars() {
        if PATTERN_ESCAPE_SET.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Escapes pattern metacharacters so `input` reads as fixed text in a
/// pattern string.
pub fn escape_pattern_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_pattern_into(input, &mut out);
    out
}

/// Compiles one component sub-pattern.
///
/// `separator` derives the "not a separator" class used by bare `:name`
/// groups; `prefix_string` is the segment prefix recognized in front of a
/// group. Case folding is only ever requested for pathname components.
#[tracing::instrument(level = "trace", skip(prefix_string, separator), fields(input = %input))]
pub fn compile_component(
    input: &str,
    prefix_string: &str,
    separator: &str,
    encoding: Encoding,
    ignore_case: bool,
) -> PatternResult<Component> {
    let seg_pattern = if separator.is_empty() {
        String::from(".+?")
    } else {
        let mut class = String::from("[^");
        escape_regex_into(separator, &mut class);
        class.push_str("]+?");
        class
    };
    let parts = parse_component_pattern(input, prefix_string, &seg_pattern, encoding)?;

    let mut group_names = GroupNames::new();
    let mut pattern = String::new();
    let mut regex_src = String::from("^");
    for (index, part) in parts.iter().enumerate() {
        let prev = index.checked_sub(1).map(|i| &parts[i]);
        let next = parts.get(index + 1);
        if part.kind == PartKind::Text {
            match part.modifier.as_char() {
                None => {
                    escape_regex_into(&part.value, &mut regex_src);
                    escape_pattern_into(&part.value, &mut pattern);
                }
                Some(modifier) => {
                    regex_src.push_str("(?:");
                    escape_regex_into(&part.value, &mut regex_src);
                    regex_src.push(')');
                    regex_src.push(modifier);
                    pattern.push('{');
                    escape_pattern_into(&part.value, &mut pattern);
                    pattern.push('}');
                    pattern.push(modifier);
                }
            }
            continue;
        }
        group_names.push(part.name.clone());

        let mut need_grouping = !part.suffix.is_empty()
            || (!part.prefix.is_empty() && part.prefix != prefix_string);
        if !need_grouping
            && part.custom_name
            && part.kind == PartKind::Segment
            && part.modifier == Modifier::None
        {
            if let Some(next_part) = next {
                if next_part.empty_prefix_suffix {
                    need_grouping = !next_part.custom_name;
                    if next_part.kind == PartKind::Text {
                        need_grouping = next_part
                            .value
                            .chars()
                            .next()
                            .is_some_and(is_xid_continue);
                    }
                }
            }
        }
        if !need_grouping && part.prefix.is_empty() {
            if let Some(prev_part) = prev {
                need_grouping =
                    prev_part.kind == PartKind::Text && prev_part.value.ends_with(prefix_string);
            }
        }

        if need_grouping {
            pattern.push('{');
        }
        escape_pattern_into(&part.prefix, &mut pattern);
        if part.custom_name {
            pattern.push(':');
            pattern.push_str(&part.name);
        }
        let body: &str = match part.kind {
            PartKind::Pattern => {
                pattern.push('(');
                pattern.push_str(&part.value);
                pattern.push(')');
                &part.value
            }
            PartKind::Segment => {
                if !part.custom_name {
                    pattern.push('(');
                    pattern.push_str(&seg_pattern);
                    pattern.push(')');
                } else if part.suffix.chars().next().is_some_and(is_xid_continue) {
                    // `:name\bar` — keep the suffix from extending the name.
                    pattern.push('\\');
                }
                &seg_pattern
            }
            PartKind::Asterisk => {
                let mut append_asterisk = !part.custom_name;
                if append_asterisk {
                    if let Some(prev_part) = prev {
                        if prev_part.kind != PartKind::Text
                            && prev_part.modifier == Modifier::None
                        {
                            append_asterisk = need_grouping || !prev_part.prefix.is_empty();
                        }
                    }
                }
                pattern.push_str(if append_asterisk { "*" } else { "(.*)" });
                ".*"
            }
            PartKind::Text => unreachable!(),
        };
        escape_pattern_into(&part.suffix, &mut pattern);
        if need_grouping {
            pattern.push('}');
        }
        if let Some(modifier) = part.modifier.as_char() {
            pattern.push(modifier);
        }

        if part.empty_prefix_suffix {
            match part.modifier {
                Modifier::None => {
                    regex_src.push('(');
                    regex_src.push_str(body);
                    regex_src.push(')');
                }
                Modifier::Optional => {
                    regex_src.push('(');
                    regex_src.push_str(body);
                    regex_src.push_str(")?");
                }
                Modifier::Plus => {
                    regex_src.push_str("((?:");
                    regex_src.push_str(body);
                    regex_src.push_str(")+)");
                }
                Modifier::Star => {
                    regex_src.push_str("((?:");
                    regex_src.push_str(body);
                    regex_src.push_str(")*)");
                }
            }
        } else {
            match part.modifier {
                Modifier::None | Modifier::Optional => {
                    regex_src.push_str("(?:");
                    escape_regex_into(&part.prefix, &mut regex_src);
                    regex_src.push('(');
                    regex_src.push_str(body);
                    regex_src.push(')');
                    escape_regex_into(&part.suffix, &mut regex_src);
                    regex_src.push(')');
                    if part.modifier == Modifier::Optional {
                        regex_src.push('?');
                    }
                }
                Modifier::Plus | Modifier::Star => {
                    // The inner capture binds the repeated body; the
                    // non-capturing tail absorbs suffix/prefix runs between
                    // repetitions.
                    regex_src.push_str("(?:");
                    escape_regex_into(&part.prefix, &mut regex_src);
                    regex_src.push_str("((?:");
                    regex_src.push_str(body);
                    regex_src.push_str(")(?:");
                    escape_regex_into(&part.suffix, &mut regex_src);
                    escape_regex_into(&part.prefix, &mut regex_src);
                    regex_src.push_str("(?:");
                    regex_src.push_str(body);
                    regex_src.push_str("))*)");
                    escape_regex_into(&part.suffix, &mut regex_src);
                    regex_src.push(')');
                    if part.modifier == Modifier::Star {
                        regex_src.push('?');
                    }
                }
            }
        }
    }
    regex_src.push('$');

    let regex = RegexBuilder::new(&regex_src)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|_| PatternError::new(PatternErrorKind::Compiler, regex_src.as_str(), 0))?;
    debug_assert_eq!(regex.captures_len(), group_names.len() + 1);
    Ok(Component {
        pattern,
        regex,
        group_names,
    })
}
