//! Community feed of traveler posts.
//!
//! Entirely client-side: the feed seeds itself with sample posts and
//! supports case-insensitive search across titles, bodies, and tags.

use crate::types::Post;

/// Aggregate figures shown beside the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    /// Travelers active on the platform.
    pub active_travelers: u64,
    /// Posts published this week.
    pub posts_this_week: u64,
    /// Countries covered by posts.
    pub countries_covered: u64,
}

/// The community feed.
#[derive(Debug, Clone)]
pub struct CommunityFeed {
    posts: Vec<Post>,
    next_id: u64,
}

impl CommunityFeed {
    /// Creates a feed populated with the seed posts.
    pub fn new() -> Self {
        let posts = seed_posts();
        let next_id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self { posts, next_id }
    }

    /// Creates an empty feed.
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            next_id: 1,
        }
    }

    /// Returns all posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Returns posts matching the query, case-insensitively, over
    /// title, content, and tags. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.matches(query)).collect()
    }

    /// Adds a post to the top of the feed, assigning it an id.
    pub fn add_post(&mut self, mut post: Post) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        post.id = id;
        self.posts.insert(0, post);
        id
    }

    /// Increments the like count of a post. Unknown ids are ignored.
    pub fn like(&mut self, id: u64) {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == id) {
            post.likes += 1;
        }
    }

    /// Returns the popular topic labels.
    pub fn popular_topics(&self) -> &'static [&'static str] {
        &[
            "Kerala Backwaters",
            "Goa Beaches",
            "Himachal Trekking",
            "Rajasthan Culture",
            "South India Food",
        ]
    }

    /// Returns the platform-wide travel stats.
    pub fn stats(&self) -> FeedStats {
        FeedStats {
            active_travelers: 2847,
            posts_this_week: 156,
            countries_covered: 23,
        }
    }
}

impl Default for CommunityFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            author: "Sarah Johnson".to_string(),
            avatar: "SJ".to_string(),
            title: "Amazing 5-day Kerala backwaters experience!".to_string(),
            content: "Just got back from an incredible houseboat journey through Alleppey \
                      and Kumarakom. The sunset views were absolutely breathtaking! Here are \
                      my top recommendations..."
                .to_string(),
            likes: 24,
            comments: 8,
            timestamp: "2 hours ago".to_string(),
            tags: vec![
                "Kerala".to_string(),
                "Backwaters".to_string(),
                "Houseboat".to_string(),
            ],
        },
        Post {
            id: 2,
            author: "Mike Chen".to_string(),
            avatar: "MC".to_string(),
            title: "Budget-friendly Goa itinerary under \u{20b9}15,000".to_string(),
            content: "Spent 4 days in Goa without breaking the bank! Stayed in hostels, ate \
                      at local joints, and still had an amazing time. Here's how I did it..."
                .to_string(),
            likes: 42,
            comments: 15,
            timestamp: "5 hours ago".to_string(),
            tags: vec!["Goa".to_string(), "Budget".to_string(), "Beach".to_string()],
        },
        Post {
            id: 3,
            author: "Priya Sharma".to_string(),
            avatar: "PS".to_string(),
            title: "Solo female travel in Himachal - Safety tips".to_string(),
            content: "Just completed a solo trek in Himachal Pradesh. Sharing some important \
                      safety tips and beautiful spots that are perfect for solo female \
                      travelers..."
                .to_string(),
            likes: 67,
            comments: 23,
            timestamp: "1 day ago".to_string(),
            tags: vec![
                "Himachal".to_string(),
                "Solo Travel".to_string(),
                "Trekking".to_string(),
                "Safety".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_seeds_three_posts() {
        let feed = CommunityFeed::new();
        assert_eq!(feed.posts().len(), 3);
    }

    #[test]
    fn search_matches_tags_case_insensitively() {
        let feed = CommunityFeed::new();
        let hits = feed.search("goa");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].author, "Mike Chen");
    }

    #[test]
    fn search_matches_title_and_content() {
        let feed = CommunityFeed::new();
        assert_eq!(feed.search("backwaters").len(), 1);
        assert_eq!(feed.search("hostels").len(), 1);
        assert!(feed.search("antarctica").is_empty());
    }

    #[test]
    fn empty_query_returns_everything() {
        let feed = CommunityFeed::new();
        assert_eq!(feed.search("").len(), feed.posts().len());
    }

    #[test]
    fn added_posts_go_to_the_top_with_fresh_ids() {
        let mut feed = CommunityFeed::new();
        let id = feed.add_post(Post {
            id: 0,
            author: "Ada".to_string(),
            avatar: "A".to_string(),
            title: "Misty mornings in Munnar".to_string(),
            content: "Tea estates as far as the eye can see.".to_string(),
            likes: 0,
            comments: 0,
            timestamp: "just now".to_string(),
            tags: vec!["Munnar".to_string()],
        });
        assert_eq!(feed.posts()[0].id, id);
        assert!(id > 3);
    }

    #[test]
    fn liking_increments_and_tolerates_unknown_ids() {
        let mut feed = CommunityFeed::new();
        let before = feed.posts()[0].likes;
        let id = feed.posts()[0].id;
        feed.like(id);
        feed.like(9999);
        assert_eq!(feed.posts()[0].likes, before + 1);
    }

    #[test]
    fn stats_and_topics_present() {
        let feed = CommunityFeed::new();
        assert_eq!(feed.stats().active_travelers, 2847);
        assert_eq!(feed.popular_topics().len(), 5);
    }
}
