//! Role → column resolution
//!
//! Priority per role: Header keyword → Content score → Secondary header → Positional.
//! A column bound to one role is never rebound: when a step's preferred column
//! is already claimed, the role is left unresolved.

use super::core::score_excluding;
use super::models::{BindingMethod, ColumnBinding, ColumnRoleMap, RoleProfile, RoleSpec};
use crate::ingest::RawGrid;
use std::collections::HashSet;

/// Resolve every role of `profile` against `grid`
///
/// Never fails; roles nothing matches are stored as unresolved.
pub fn resolve(grid: &RawGrid, profile: &RoleProfile) -> ColumnRoleMap {
    let mut map = ColumnRoleMap::default();
    // Track already bound columns to prevent two roles sharing one
    let mut claimed = HashSet::new();
    let header = grid.header().unwrap_or(&[]);

    for spec in &profile.roles {
        let binding = resolve_role(grid, header, spec, profile, &claimed);

        match &binding {
            Some(bound) => {
                claimed.insert(bound.column);
                log::debug!(
                    "[{}] {} -> column {} {}",
                    profile.name,
                    spec.role,
                    bound.column,
                    bound.method.label()
                );
            }
            None => log::debug!("[{}] {} unresolved", profile.name, spec.role),
        }

        map.insert(spec.role, binding);
    }

    map
}

fn resolve_role(
    grid: &RawGrid,
    header: &[String],
    spec: &RoleSpec,
    profile: &RoleProfile,
    claimed: &HashSet<usize>,
) -> Option<ColumnBinding> {
    // 1. Primary header keywords
    if let Some(column) = match_header(header, &spec.keywords, &spec.excluded_tokens) {
        return bind_unclaimed(column, BindingMethod::Header, claimed);
    }

    // 2. Content score over the sampled data rows, ignoring vetoed headers
    if let Some(kind) = spec.content {
        let vetoed = vetoed_columns(header, &spec.excluded_tokens);
        let predicate = |cell: &str| profile.classifier.matches(kind, cell);
        if let Some(column) = score_excluding(grid, predicate, profile.sample_size, &vetoed) {
            return bind_unclaimed(column, BindingMethod::Content, claimed);
        }
    }

    // 3. Ambiguous header keywords, only trusted when content gave nothing
    if let Some(column) = match_header(header, &spec.secondary_keywords, &spec.excluded_tokens) {
        return bind_unclaimed(column, BindingMethod::SecondaryHeader, claimed);
    }

    // 4. Column 0 for the primary role
    if profile.primary == Some(spec.role) && grid.column_count() > 0 {
        return bind_unclaimed(0, BindingMethod::Positional, claimed);
    }

    None
}

/// Bind the column a step preferred, or leave the role unresolved when an
/// earlier role already owns it
fn bind_unclaimed(
    column: usize,
    method: BindingMethod,
    claimed: &HashSet<usize>,
) -> Option<ColumnBinding> {
    if claimed.contains(&column) {
        log::debug!("Column {} {} is already claimed", column, method.label());
        return None;
    }
    Some(ColumnBinding { column, method })
}

/// First header cell matching `keywords` and not `excluded`
fn match_header(header: &[String], keywords: &[String], excluded: &[String]) -> Option<usize> {
    if keywords.is_empty() {
        return None;
    }
    header
        .iter()
        .position(|text| header_matches(text, keywords, excluded))
}

/// Columns whose header carries an excluded word
fn vetoed_columns(header: &[String], excluded: &[String]) -> HashSet<usize> {
    header
        .iter()
        .enumerate()
        .filter(|(_, text)| is_vetoed(&text.to_lowercase(), excluded))
        .map(|(column, _)| column)
        .collect()
}

/// Keywords shorter than this only match a whole header word
const MIN_SUBSTRING_KEYWORD: usize = 4;

/// Case-insensitive keyword match, vetoed by excluded whole words
///
/// Longer keywords match anywhere (`"Full Name"` and `"fullname"` both match
/// `name`); short ones such as `day` or `tel` must be a word of their own so
/// `"Monday"` and `"Hotel"` do not match. `"ad_name"` and `"Campaign name"`
/// do not match when `ad` / `campaign` are excluded.
pub fn header_matches(text: &str, keywords: &[String], excluded: &[String]) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() || is_vetoed(&lowered, excluded) {
        return false;
    }

    keywords.iter().any(|keyword| {
        if keyword.chars().count() < MIN_SUBSTRING_KEYWORD {
            tokens(&lowered).any(|token| token == keyword.as_str())
        } else {
            lowered.contains(keyword.as_str())
        }
    })
}

fn is_vetoed(lowered: &str, excluded: &[String]) -> bool {
    tokens(lowered).any(|token| excluded.iter().any(|word| word == token))
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::tokenize;
    use crate::services::inference::models::Role;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn assert_no_collisions(map: &ColumnRoleMap) {
        let columns: Vec<usize> = map.iter().filter_map(|(_, b)| b.map(|b| b.column)).collect();
        let unique: HashSet<usize> = columns.iter().copied().collect();
        assert_eq!(columns.len(), unique.len(), "roles share a column: {map:?}");
    }

    #[test]
    fn test_header_matches_with_exclusions() {
        let keywords = strings(&["name"]);
        let excluded = strings(&["campaign", "ad"]);
        assert!(header_matches("Full Name", &keywords, &excluded));
        assert!(header_matches("NOMBRE / name", &keywords, &excluded));
        assert!(!header_matches("ad_name", &keywords, &excluded));
        assert!(!header_matches("Campaign Name", &keywords, &excluded));
        assert!(!header_matches("", &keywords, &excluded));
        // "address" is not the excluded word "ad"
        assert!(header_matches("address name", &keywords, &excluded));
    }

    #[test]
    fn test_plain_headers() {
        let grid = tokenize("Name,Email,Phone\n\"Doe, Jane\",jane@x.com,555-1234");
        let map = resolve(&grid, &RoleProfile::leads());

        assert_eq!(map.get(Role::Name), Some(0));
        assert_eq!(map.get(Role::Email), Some(1));
        assert_eq!(map.get(Role::Phone), Some(2));
        assert_eq!(map.get(Role::Product), None);
        assert_eq!(map.binding(Role::Email).unwrap().method, BindingMethod::Header);
    }

    #[test]
    fn test_mislabeled_headers() {
        let grid = tokenize(
            "Full Name,Contact\n\
             jane@x.com,555-123-4567\n\
             joe@y.org,+1 (555) 987 6543\n\
             ann@z.net,5550001111",
        );
        let map = resolve(&grid, &RoleProfile::leads());

        assert_eq!(map.get(Role::Email), Some(0));
        assert_eq!(map.binding(Role::Email).unwrap().method, BindingMethod::Content);
        assert_eq!(map.get(Role::Phone), Some(1));
        // The "Full Name" column is taken, name is left unresolved rather than stealing it
        assert_eq!(map.get(Role::Name), None);
        assert_no_collisions(&map);
    }

    #[test]
    fn test_positional_fallback() {
        let grid = tokenize("#1,??\n#2,!!\n#3,~~");
        let map = resolve(&grid, &RoleProfile::leads());

        assert_eq!(map.get(Role::Name), Some(0));
        assert_eq!(map.binding(Role::Name).unwrap().method, BindingMethod::Positional);
        assert_eq!(map.get(Role::Email), None);
        assert_eq!(map.get(Role::Phone), None);
        assert_eq!(map.get(Role::Product), None);
    }

    #[test]
    fn test_ad_platform_name_columns_are_skipped() {
        let grid = tokenize(
            "campaign_name,ad_name,full_name,email,phone_number\n\
             Spring,Video A,Jane Doe,jane@x.com,p:+34600111222",
        );
        let map = resolve(&grid, &RoleProfile::leads());

        assert_eq!(map.get(Role::Name), Some(2));
        assert_eq!(map.get(Role::Email), Some(3));
        assert_eq!(map.get(Role::Phone), Some(4));
    }

    #[test]
    fn test_secondary_header_only_after_content() {
        // "Number" is ambiguous; phone-shaped cells under "Reach Me" win through content first
        let grid =
            tokenize("Client,Order Number,Reach Me\nJane,12,600 111 222\nJoe,13,600 333 444");
        let map = resolve(&grid, &RoleProfile::leads());
        assert_eq!(map.get(Role::Phone), Some(2));
        assert_eq!(map.binding(Role::Phone).unwrap().method, BindingMethod::Content);

        // Without phone-shaped content the secondary keyword decides
        let grid = tokenize("Client,Contact Number\nJane,ask later\nJoe,ask later");
        let map = resolve(&grid, &RoleProfile::leads());
        assert_eq!(map.get(Role::Phone), Some(1));
        assert_eq!(
            map.binding(Role::Phone).unwrap().method,
            BindingMethod::SecondaryHeader
        );
    }

    #[test]
    fn test_positional_fallback_does_not_steal() {
        let grid = tokenize("x,y\nj@x.io,1\nk@x.io,2");
        let map = resolve(&grid, &RoleProfile::leads());
        assert_eq!(map.get(Role::Email), Some(0));
        assert_eq!(map.get(Role::Name), None);
    }

    #[test]
    fn test_metrics_roles_by_header() {
        let grid = tokenize(
            "Date,Reach,Engagement,Engagement Rate,Followers\n\
             2024-03-01,100,10,10%,500",
        );
        let map = resolve(&grid, &RoleProfile::metrics());
        assert_eq!(map.get(Role::Date), Some(0));
        assert_eq!(map.get(Role::Reach), Some(1));
        assert_eq!(map.get(Role::Engagement), Some(2));
        assert_eq!(map.get(Role::Followers), Some(4));
    }

    #[test]
    fn test_metrics_roles_by_content_do_not_take_the_next_best_column() {
        // Every numeric column scores the same; reach takes the first and the
        // later roles prefer that same column, so they stay unresolved
        let grid = tokenize("a,b,c,d\n2024-03-01,100,10,500\n2024-03-02,120,12,510");
        let map = resolve(&grid, &RoleProfile::metrics());
        assert_eq!(map.get(Role::Date), Some(0));
        assert_eq!(map.get(Role::Reach), Some(1));
        assert_eq!(map.get(Role::Engagement), None);
        assert_eq!(map.get(Role::Followers), None);
        assert_no_collisions(&map);
    }

    #[test]
    fn test_rate_column_is_not_taken_as_followers() {
        let grid = tokenize(
            "Date,Reach,Engagement,Engagement Rate\n\
             2024-03-01,100,10,10%\n\
             2024-03-02,100,15,15%",
        );
        let map = resolve(&grid, &RoleProfile::metrics());
        assert_eq!(map.get(Role::Engagement), Some(2));
        assert_eq!(map.get(Role::Followers), None);
    }

    #[test]
    fn test_preferred_header_already_claimed_leaves_role_unresolved() {
        // Phone falls back to the "Contact Name" header; name would prefer the same column
        let grid = tokenize("Contact Name,Notes\nask later,call Jane\nask later,call Joe");
        let map = resolve(&grid, &RoleProfile::leads());
        assert_eq!(map.get(Role::Phone), Some(0));
        assert_eq!(map.get(Role::Name), None);
    }

    #[test]
    fn test_short_keywords_match_whole_words_only() {
        let keywords = strings(&["day", "dia", "tel"]);
        assert!(header_matches("Day", &keywords, &[]));
        assert!(header_matches("Día / dia", &keywords, &[]));
        assert!(header_matches("Tel.", &keywords, &[]));
        assert!(!header_matches("Monday", &keywords, &[]));
        assert!(!header_matches("Today", &keywords, &[]));
        assert!(!header_matches("Media Type", &keywords, &[]));
        assert!(!header_matches("Hotel", &keywords, &[]));
    }

    #[test]
    fn test_media_type_column_is_not_a_date() {
        let grid = tokenize(
            "Media Type,Date,Reach,Engagement,Followers\n\
             Video,2024-03-01,100,10,500\n\
             Reel,2024-03-02,120,12,510",
        );
        let map = resolve(&grid, &RoleProfile::metrics());
        assert_eq!(map.get(Role::Date), Some(1));
        assert_eq!(map.binding(Role::Date).unwrap().method, BindingMethod::Header);
        assert_eq!(map.get(Role::Reach), Some(2));
        assert_eq!(map.get(Role::Followers), Some(4));
    }

    #[test]
    fn test_no_collisions_on_hostile_headers() {
        let inputs = [
            "email,email,email\na@b.co,c@d.co,e@f.co",
            "name,name\nJane,Joe",
            "phone,phone number,mobile\n5551234567,5551234567,5551234567",
            "\"\"\"\n,,,\n\"a,b",
            "",
        ];
        for input in inputs {
            let grid = tokenize(input);
            assert_no_collisions(&resolve(&grid, &RoleProfile::leads()));
            assert_no_collisions(&resolve(&grid, &RoleProfile::metrics()));
        }
    }

    #[test]
    fn test_empty_grid_resolves_nothing() {
        let map = resolve(&RawGrid::default(), &RoleProfile::leads());
        assert_eq!(map.resolved_count(), 0);
        assert_eq!(map.iter().count(), 4);
    }
}
