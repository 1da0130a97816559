use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::{
    Author, Comment, CommentAuthor, FilterCategory, Profile, Session, User, Video, VideoStatus,
    Visibility,
};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::Rng;

/// Session identifier stamped on analytics events by the mock backend
pub const MOCK_SESSION_ID: &str = "mock_session_123";

const SAMPLE_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

const GENERATED_TITLES: [&str; 10] = [
    "Ultimate Gaming Setup Tour 2024",
    "React Like a Pro: Advanced Strategies",
    "The Psychology of Winning",
    "Hardware Review: Is This Worth It?",
    "Community Highlights - January Edition",
    "Speed Run World Record Attempt",
    "Behind the Scenes: Tournament Prep",
    "Coaching Session: Improve Your Game",
    "New Update Changes Everything",
    "Fan Art Showcase and Reactions",
];

const GENERATED_USERNAMES: [&str; 10] = [
    "StreamerElite",
    "GamingLegend",
    "CompetitiveEdge",
    "ProPlayer_Official",
    "ContentCreator_Pro",
    "ESportsAnalyst",
    "GameReviewer",
    "ClutchGaming",
    "TournamentCaster",
    "CommunitySpotlight",
];

const GENERATED_THUMBNAILS: [&str; 4] = [
    "https://images.pexels.com/photos/194511/pexels-photo-194511.jpeg?auto=compress&cs=tinysrgb&w=400&h=225",
    "https://images.pexels.com/photos/159613/ghettoblaster-radio-recorder-boombox-159613.jpeg?auto=compress&cs=tinysrgb&w=400&h=225",
    "https://images.pexels.com/photos/267350/pexels-photo-267350.jpeg?auto=compress&cs=tinysrgb&w=400&h=225",
    "https://images.pexels.com/photos/290595/pexels-photo-290595.jpeg?auto=compress&cs=tinysrgb&w=400&h=225",
];

const GENERATED_COUNT: usize = 30;
const GENERATED_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

fn fixed(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .expect("Fixed datetime should be valid")
}

fn pexels(photo: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=400&h=225"
    )
}

struct FixedVideo {
    title: &'static str,
    username: &'static str,
    display_name: &'static str,
    photo: u32,
    duration: u32,
    views: u64,
    likes: u64,
    dislikes: u64,
    published_at: DateTime<Utc>,
}

fn fixed_videos() -> Vec<FixedVideo> {
    vec![
        FixedVideo {
            title: "Epic Gaming Montage - Best Plays 2024",
            username: "ProGamer_2024",
            display_name: "Pro Gamer",
            photo: 442576,
            duration: 485,
            views: 125_400,
            likes: 12_400,
            dislikes: 890,
            published_at: fixed(2024, 1, 15, 10, 30),
        },
        FixedVideo {
            title: "How to Master Advanced Techniques in 10 Minutes",
            username: "TechMaster_Pro",
            display_name: "Tech Master",
            photo: 735911,
            duration: 612,
            views: 89_300,
            likes: 6_100,
            dislikes: 240,
            published_at: fixed(2024, 1, 14, 15, 45),
        },
        FixedVideo {
            title: "LIVE: Championship Finals - Don't Miss Out!",
            username: "ESports_Central",
            display_name: "ESports Central",
            photo: 3165335,
            duration: 0,
            views: 234_500,
            likes: 19_800,
            dislikes: 1_020,
            published_at: fixed(2024, 1, 16, 20, 0),
        },
        FixedVideo {
            title: "Beginner's Guide to Competitive Gaming",
            username: "GameGuide_Official",
            display_name: "Game Guide Official",
            photo: 1337247,
            duration: 892,
            views: 56_700,
            likes: 3_900,
            dislikes: 150,
            published_at: fixed(2024, 1, 13, 12, 20),
        },
        FixedVideo {
            title: "Insane Clutch Moments That Will Blow Your Mind",
            username: "ClutchMoments",
            display_name: "Clutch Moments",
            photo: 275033,
            duration: 367,
            views: 178_900,
            likes: 15_200,
            dislikes: 610,
            published_at: fixed(2024, 1, 12, 18, 15),
        },
        FixedVideo {
            title: "Breaking Down the Meta: What Changed This Patch",
            username: "MetaAnalysis",
            display_name: "Meta Analysis",
            photo: 777001,
            duration: 756,
            views: 92_400,
            likes: 7_300,
            dislikes: 330,
            published_at: fixed(2024, 1, 11, 14, 30),
        },
    ]
}

/// The mock catalog: six hand-written videos followed by generated filler
pub(crate) fn mock_videos(rng: &mut impl Rng) -> Vec<Video> {
    let mut videos: Vec<Video> = fixed_videos()
        .into_iter()
        .enumerate()
        .map(|(index, seed)| {
            let number = index + 1;
            Video {
                id: number.to_string(),
                title: seed.title.to_string(),
                status: VideoStatus::Published,
                visibility: Visibility::Public,
                author: Author {
                    id: format!("user{}", number),
                    username: seed.username.to_string(),
                    display_name: seed.display_name.to_string(),
                    avatar_url: Some(avatar_url(number)),
                    follower_count: Some(seed.views / 2),
                },
                thumbnail_url: pexels(seed.photo),
                video_url: (seed.duration > 0).then(|| SAMPLE_VIDEO_URL.to_string()),
                duration: seed.duration,
                view_count: seed.views,
                like_count: seed.likes,
                dislike_count: seed.dislikes,
                is_live: seed.duration == 0,
                created_at: seed.published_at,
                updated_at: seed.published_at,
                published_at: seed.published_at,
                description: Some(Sentence(6..14).fake()),
            }
        })
        .collect();

    let now = Utc::now();
    let start = videos.len() + 1;
    for number in start..start + GENERATED_COUNT {
        let slot = number - start;
        let username = GENERATED_USERNAMES[slot % GENERATED_USERNAMES.len()];
        let views: u64 = rng.gen_range(1_000..501_000);
        let likes = views * rng.gen_range(2..9) / 100;
        let mut ago = || now - Duration::seconds(rng.gen_range(0..GENERATED_MAX_AGE_SECS));
        let (created_at, updated_at, published_at) = (ago(), ago(), ago());

        videos.push(Video {
            id: number.to_string(),
            title: GENERATED_TITLES[slot % GENERATED_TITLES.len()].to_string(),
            status: VideoStatus::Published,
            visibility: Visibility::Public,
            author: Author {
                id: format!("user{}", number),
                username: username.to_string(),
                display_name: username.replacen('_', " ", 1),
                avatar_url: Some(avatar_url(number)),
                follower_count: Some(views / 3),
            },
            thumbnail_url: GENERATED_THUMBNAILS[slot % GENERATED_THUMBNAILS.len()].to_string(),
            video_url: Some(SAMPLE_VIDEO_URL.to_string()),
            duration: rng.gen_range(120..1020),
            view_count: views,
            like_count: likes,
            dislike_count: likes / rng.gen_range(10..30),
            is_live: false,
            created_at,
            updated_at,
            published_at,
            // fake draws from the thread RNG, so descriptions are not seeded
            description: Some(Sentence(6..14).fake()),
        });
    }

    videos
}

fn avatar_url(seed: usize) -> String {
    const AVATARS: [u32; 4] = [220453, 774909, 697509, 1040880];
    let photo = AVATARS[seed % AVATARS.len()];
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=100"
    )
}

fn commenter(username: &str, seed: usize) -> CommentAuthor {
    CommentAuthor {
        username: username.to_string(),
        avatar_url: avatar_url(seed),
    }
}

/// Seeded comment thread for a video, in display order
pub(crate) fn mock_comments(video: &Video) -> Vec<Comment> {
    let at = |minutes: i64| video.published_at + Duration::minutes(minutes);
    vec![
        Comment {
            id: format!("{}-c1", video.id),
            author: commenter("GamerElite", 1),
            content: "Great breakdown! Definitely overkill for most people, but if you have the budget, why not?".to_string(),
            like_count: 45,
            published_at: at(75),
            replies: Vec::new(),
        },
        Comment {
            id: format!("{}-c2", video.id),
            author: commenter("TechNinja", 2),
            content: "The difference is insane! My electricity bill would not be happy.".to_string(),
            like_count: 23,
            published_at: at(110),
            replies: vec![Comment {
                id: format!("{}-c2-r1", video.id),
                author: commenter(&video.author.username, 0),
                content: "Haha yeah, it's a power hungry beast! Worth it if you're going all in though.".to_string(),
                like_count: 12,
                published_at: at(160),
                replies: Vec::new(),
            }],
        },
        Comment {
            id: format!("{}-c3", video.id),
            author: commenter("BudgetGamer", 3),
            content: "Still rocking my old setup. Maybe one day I'll upgrade to something from this decade".to_string(),
            like_count: 67,
            published_at: at(215),
            replies: Vec::new(),
        },
    ]
}

/// Count displayed next to a filter pill
pub(crate) fn advertised_count(category: FilterCategory, total: u32) -> u32 {
    match category {
        FilterCategory::All => total,
        FilterCategory::Trending => 12,
        FilterCategory::Gaming => 24,
        FilterCategory::Esports => 8,
        FilterCategory::Tutorials => 6,
        FilterCategory::Live => 3,
    }
}

/// The single account known to the mock backend
pub fn mock_user() -> Session {
    Session {
        user: User {
            id: "current_user_1".to_string(),
            username: "clutch_player_2024".to_string(),
            email: "player@clutch.com".to_string(),
            created_at: fixed(2023, 12, 1, 10, 0),
            updated_at: fixed(2024, 1, 16, 14, 30),
        },
        profile: Profile {
            user_id: "current_user_1".to_string(),
            display_name: "Clutch Player".to_string(),
            avatar_url: avatar_url(0),
            bio: "Gaming enthusiast and content creator".to_string(),
            created_at: fixed(2023, 12, 1, 10, 0),
            updated_at: fixed(2024, 1, 10, 16, 20),
        },
    }
}
