//! Comment normalizer: strip `///`, `/** */` and `*` decoration from a raw
//! documentation comment, leaving only the tag markup.

/// Normalize a raw comment block.
///
/// Returns an empty string when nothing but decoration and whitespace is
/// left; callers treat that as "undocumented".
pub fn normalize(raw: &str) -> String {
    let mut in_block = false;
    let mut lines = Vec::new();
    for line in raw.lines() {
        let mut line = line.trim();
        let opened = match line.strip_prefix("/**") {
            Some(rest) => {
                line = rest;
                in_block = true;
                true
            }
            None => false,
        };

        if in_block {
            if let Some(rest) = line.strip_suffix("*/") {
                line = rest;
                in_block = false;
            }
            // one `*` of gutter per line, `* /// text` included
            if !opened {
                line = line.strip_prefix('*').unwrap_or(line);
            }
            line = line.trim_start();
            line = line.strip_prefix("///").unwrap_or(line);
        } else {
            line = line.strip_prefix("///").unwrap_or(line);
        }

        let line = line.trim();
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_triple_slash() {
        let raw = "/// <summary>\n    /// Fetches a user.\n    /// </summary>";
        assert_eq!(normalize(raw), "<summary>\nFetches a user.\n</summary>");
    }

    #[test]
    fn strips_block_comment_decoration() {
        let raw = "/**\n * <summary>Hi</summary>\n * <remarks>More</remarks>\n */";
        assert_eq!(normalize(raw), "<summary>Hi</summary>\n<remarks>More</remarks>");
    }

    #[test]
    fn single_line_block_comment() {
        assert_eq!(normalize("/** <summary>x</summary> */"), "<summary>x</summary>");
    }

    #[test]
    fn blank_lines_dropped_order_kept() {
        let raw = "///\n/// a\n///    \n/// b\n";
        assert_eq!(normalize(raw), "a\nb");
    }

    #[test]
    fn decoration_only_is_empty() {
        assert_eq!(normalize("///\n   ///   \n/**\n */"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn self_closing_tags_survive() {
        assert_eq!(normalize("/// <see cref=\"Foo\"/>"), "<see cref=\"Foo\"/>");
    }

    #[test]
    fn leading_star_is_content_after_triple_slash() {
        assert_eq!(normalize("///*Note*: x"), "*Note*: x");
        assert_eq!(normalize("/// *Note*: x"), "*Note*: x");
    }

    #[test]
    fn block_gutter_strips_one_star() {
        let raw = "/**\n * *Note*: x\n *  <para>y</para>\n */";
        assert_eq!(normalize(raw), "*Note*: x\n<para>y</para>");
    }
}
