//! Deriving a file's locale from its path via a template such as
//! `[dir]/[locale]/[basename].json` or `res/values-[language]-r[region]/strings.xml`.

use regex::Regex;
use tracing::warn;

const LANGUAGE: &str = "[a-z]{2,3}";
const SCRIPT: &str = "[A-Z][a-z]{3}";
const REGION: &str = "[A-Z]{2}|[0-9]{3}";

/// Builds regex fragments, naming each part only the first time it appears
/// (the regex engine rejects duplicate group names).
#[derive(Default)]
struct GroupNames {
    used: Vec<&'static str>,
}

impl GroupNames {
    fn group(&mut self, name: &'static str, pattern: &str) -> String {
        if self.used.contains(&name) {
            format!("(?:{pattern})")
        } else {
            self.used.push(name);
            format!("(?P<{name}>{pattern})")
        }
    }

    fn locale_parts(&mut self, sep: &str, lower: bool) -> String {
        let (script, region) = if lower {
            ("[a-z]{4}", "[a-z]{2}|[0-9]{3}")
        } else {
            (SCRIPT, REGION)
        };
        let sep = regex::escape(sep);
        format!(
            "{}(?:{sep}{})?(?:{sep}{})?",
            self.group("language", LANGUAGE),
            self.group("script", script),
            self.group("region", region)
        )
    }
}

/// Translate `template` into an anchored regex for paths relative to the
/// project root. Returns `None` when the template uses an unknown keyword.
fn template_regex(template: &str, path: &str) -> Option<Regex> {
    let mut names = GroupNames::default();
    let mut pattern = String::from("^");
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        pattern.push_str(&regex::escape(&rest[..open]));
        let Some(close) = rest[open..].find(']').map(|i| open + i) else {
            pattern.push_str(&regex::escape(&rest[open..]));
            rest = "";
            break;
        };
        let keyword = &rest[open + 1..close];
        let fragment = match keyword {
            "dir" => ".*".to_string(),
            "basename" => "[^/]*?".to_string(),
            "extension" => "[^/]*".to_string(),
            "filename" => {
                let base = path.rsplit('/').next().unwrap_or(path);
                regex::escape(base)
            }
            "locale" => {
                let inner = names.locale_parts("-", false);
                if names.used.contains(&"locale") {
                    format!("(?:{inner})")
                } else {
                    names.used.push("locale");
                    format!("(?P<locale>{inner})")
                }
            }
            "language" => names.group("language", LANGUAGE),
            "script" => names.group("script", SCRIPT),
            "region" => names.group("region", REGION),
            "localeDir" => names.locale_parts("/", false),
            "localeUnder" => names.locale_parts("_", false),
            "localeLower" => names.locale_parts("-", true),
            other => {
                warn!(template, keyword = other, "unknown keyword in path template");
                return None;
            }
        };
        pattern.push_str(&fragment);
        rest = &rest[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(template, %err, "path template does not form a valid pattern");
            None
        }
    }
}

/// Title-case a script code and upper-case a region so lower-case path
/// spellings produce canonical locale specs.
fn canonical(language: &str, script: Option<&str>, region: Option<&str>) -> String {
    let mut spec = language.to_ascii_lowercase();
    if let Some(script) = script {
        let mut chars = script.chars();
        if let Some(first) = chars.next() {
            spec.push('-');
            spec.push(first.to_ascii_uppercase());
            spec.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }
    if let Some(region) = region {
        spec.push('-');
        spec.push_str(&region.to_ascii_uppercase());
    }
    spec
}

/// Locale spec encoded in `path` according to `template`, if the path
/// matches and carries one.
pub fn locale_from_path(template: &str, path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    let re = template_regex(template, &path)?;
    let caps = re.captures(&path)?;

    if let Some(locale) = caps.name("locale") {
        return Some(locale.as_str().to_string());
    }
    let language = caps.name("language")?;
    Some(canonical(
        language.as_str(),
        caps.name("script").map(|m| m.as_str()),
        caps.name("region").map(|m| m.as_str()),
    ))
}
