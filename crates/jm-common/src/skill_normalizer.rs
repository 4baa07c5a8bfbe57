use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

/// Alias → canonical skill token. Both sides of a comparison go through
/// the same table, so overlap stays symmetric.
static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        ("javascript", &["js", "java script", "ecmascript", "es6"]),
        ("typescript", &["ts", "type script"]),
        ("nodejs", &["node.js", "node js", "node"]),
        ("react", &["reactjs", "react.js", "react js"]),
        ("vue", &["vue.js", "vuejs", "vue js"]),
        ("nextjs", &["next.js", "next js"]),
        ("python", &["python3", "python 3", "py"]),
        ("golang", &["go", "go lang"]),
        ("csharp", &["c#", "c sharp", ".net", "dotnet"]),
        ("cplusplus", &["c++", "cpp"]),
        ("postgresql", &["postgres", "postgre sql"]),
        ("mysql", &["my sql", "mariadb"]),
        ("mongodb", &["mongo", "mongo db"]),
        ("kubernetes", &["k8s", "kube"]),
        ("aws", &["amazon web services"]),
        ("gcp", &["google cloud platform", "google cloud"]),
        ("fastapi", &["fast api"]),
        ("spring", &["spring boot", "springboot"]),
    ];

    let mut map = HashMap::new();
    for (canonical, alias_list) in aliases {
        map.insert(*canonical, *canonical);
        for alias in *alias_list {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// NFKC, lower-case, trim and collapse inner whitespace.
pub fn nfkc_lower_trim(input: &str) -> String {
    let folded: String = input.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form of a single skill token; None when the token is blank.
pub fn normalize_skill(skill: &str) -> Option<String> {
    let normalized = nfkc_lower_trim(skill);
    if normalized.is_empty() {
        return None;
    }

    Some(
        ALIAS_TO_CANONICAL
            .get(normalized.as_str())
            .map(|canonical| (*canonical).to_string())
            .unwrap_or(normalized),
    )
}

/// Canonicalized, deduplicated skill set. Blank tokens are dropped.
pub fn normalize_skill_set<'a, I>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    skills
        .into_iter()
        .filter_map(|skill| normalize_skill(skill))
        .collect()
}
