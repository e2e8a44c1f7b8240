//! Stored-procedure call text
//!
//! The call form is `CALL name(?,?,?)`: one positional placeholder per bound
//! parameter, comma-separated, no trailing separator.

pub const CALL_KEYWORD: &str = "CALL";

/// Build the call text for `procedure` with `param_count` placeholders
///
/// ```
/// use procmap_core::call::build_call;
///
/// assert_eq!(build_call("create_user", 3), "CALL create_user(?,?,?)");
/// assert_eq!(build_call("ping", 0), "CALL ping()");
/// ```
pub fn build_call(procedure: &str, param_count: usize) -> String {
    let placeholders = vec!["?"; param_count].join(",");
    format!("{} {}({})", CALL_KEYWORD, procedure, placeholders)
}

/// A parsed call form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallText<'a> {
    pub procedure: &'a str,
    pub placeholder_count: usize,
}

/// Parse text produced by [`build_call`]
///
/// Returns `None` for anything that is not a call form, which lets a
/// collaborator pass ordinary SQL through untouched. The keyword is matched
/// case-insensitively.
pub fn parse_call(text: &str) -> Option<CallText<'_>> {
    let text = text.trim();
    let (keyword, rest) = text.split_once(char::is_whitespace)?;
    if !keyword.eq_ignore_ascii_case(CALL_KEYWORD) {
        return None;
    }

    let rest = rest.trim_start();
    let open = rest.find('(')?;
    let procedure = rest[..open].trim_end();
    let args = rest[open + 1..].trim_end().strip_suffix(')')?;
    if procedure.is_empty() {
        return None;
    }

    let args = args.trim();
    let placeholder_count = if args.is_empty() {
        0
    } else {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.iter().any(|p| *p != "?") {
            return None;
        }
        parts.len()
    };

    Some(CallText {
        procedure,
        placeholder_count,
    })
}
