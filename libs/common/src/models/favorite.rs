//! Favorite artists and the rules that keep a favorites list consistent
//!
//! A favorites list behaves as a set keyed by artist id: inserting an id that
//! is already present leaves the list untouched, and removing an absent id is
//! not an error. Listings are always presented newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved reference to an external artist, snapshotted when it was favorited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// External artist id
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub deathday: String,
    #[serde(default)]
    pub nationality: String,
}

/// Outcome of adding a favorite to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteInsert {
    Added,
    AlreadyPresent,
}

/// Insert `favorite` unless an entry with the same artist id exists.
pub fn insert_favorite(favorites: &mut Vec<Favorite>, favorite: Favorite) -> FavoriteInsert {
    if favorites.iter().any(|existing| existing.id == favorite.id) {
        return FavoriteInsert::AlreadyPresent;
    }

    favorites.push(favorite);
    FavoriteInsert::Added
}

/// Remove every entry for `artist_id`, returning whether anything was removed.
pub fn remove_favorite(favorites: &mut Vec<Favorite>, artist_id: &str) -> bool {
    let before = favorites.len();
    favorites.retain(|favorite| favorite.id != artist_id);
    favorites.len() != before
}

/// Sort by `added_at`, most recent first. Ties keep insertion order.
pub fn newest_first(mut favorites: Vec<Favorite>) -> Vec<Favorite> {
    favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    favorites
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn favorite(id: &str, secs: i64) -> Favorite {
        Favorite {
            id: id.to_string(),
            name: format!("Artist {id}"),
            image_url: String::new(),
            added_at: Utc.timestamp_opt(secs, 0).unwrap(),
            birthday: String::new(),
            deathday: String::new(),
            nationality: String::new(),
        }
    }

    #[test]
    fn test_duplicate_insert_is_a_no_op() {
        let mut favorites = Vec::new();
        assert_eq!(
            insert_favorite(&mut favorites, favorite("a", 1)),
            FavoriteInsert::Added
        );
        assert_eq!(
            insert_favorite(&mut favorites, favorite("a", 5)),
            FavoriteInsert::AlreadyPresent
        );

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].added_at, Utc.timestamp_opt(1, 0).unwrap());
    }

    #[test]
    fn test_remove_absent_leaves_list_unchanged() {
        let mut favorites = vec![favorite("a", 1)];
        assert!(!remove_favorite(&mut favorites, "zzz"));
        assert_eq!(favorites, vec![favorite("a", 1)]);

        assert!(remove_favorite(&mut favorites, "a"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_newest_first_ordering() {
        let favorites = vec![favorite("A", 1), favorite("B", 3), favorite("C", 2)];
        let ids: Vec<_> = newest_first(favorites)
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, ["B", "C", "A"]);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let value = serde_json::to_value(favorite("4d8b92b34eb68a1b2c0003f4", 0)).unwrap();
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("addedAt").is_some());
        assert!(value.get("image_url").is_none());
    }
}
