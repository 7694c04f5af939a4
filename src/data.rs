//! Built-in records served when a fixture cannot be fetched.

use crate::types::{GameRecord, MovieRecord, VideoRecord};

pub fn fallback_games() -> Vec<GameRecord> {
    vec![
        GameRecord {
            name: "PUBG: BATTLEGROUNDS".into(),
            appid: "578080".into(),
            total_reviews: 276279,
            rating: 63.12,
            image_url: "https://shared.akamai.steamstatic.com/store_item_assets/steam/apps/578080/header.jpg".into(),
            library_image: "https://cdn.akamai.steamstatic.com/steam/apps/578080/library_600x900.jpg".into(),
            max_players: "3257248".into(),
        },
        GameRecord {
            name: "Black Myth: Wukong".into(),
            appid: "2358720".into(),
            total_reviews: 59063,
            rating: 94.18,
            image_url: "https://shared.akamai.steamstatic.com/store_item_assets/steam/apps/2358720/header.jpg".into(),
            library_image: "https://cdn.akamai.steamstatic.com/steam/apps/2358720/library_600x900.jpg".into(),
            max_players: "2415714".into(),
        },
    ]
}

pub fn fallback_movies() -> Vec<MovieRecord> {
    vec![MovieRecord {
        id: 1,
        title: "The Shawshank Redemption".into(),
        year: 1994,
        director: "Frank Darabont".into(),
        actors: vec!["Tim Robbins".into(), "Morgan Freeman".into(), "Bob Gunton".into()],
        plot: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.".into(),
        poster: "https://m.media-amazon.com/images/M/MV5BNDE3ODcxYzMtY2YzZC00NmNlLWJiNDMtZDViZWM2MzIxZDYwXkEyXkFqcGdeQXVyNjAwNDUxODI@._V1_.jpg".into(),
        rating: 9.3,
    }]
}

pub fn fallback_videos() -> Vec<VideoRecord> {
    vec![
        VideoRecord::new("nBMtB2L3UjI", "https://www.youtube.com/watch?v=nBMtB2L3UjI", "youtube"),
        VideoRecord::new("NDsO1LT_0lw", "https://www.youtube.com/watch?v=NDsO1LT_0lw", "youtube"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_sizes_and_order() {
        let games = fallback_games();
        assert_eq!(games.iter().map(|g| g.appid.as_str()).collect::<Vec<_>>(), ["578080", "2358720"]);
        assert_eq!(fallback_movies().len(), 1);
        assert_eq!(fallback_movies()[0].actors.len(), 3);
        let videos = fallback_videos();
        assert_eq!(videos.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), ["nBMtB2L3UjI", "NDsO1LT_0lw"]);
    }

    #[test]
    fn fallback_videos_match_their_urls() {
        for v in fallback_videos() {
            let derived = VideoRecord::from_url(&v.url).unwrap();
            assert_eq!(derived, v);
        }
    }
}
