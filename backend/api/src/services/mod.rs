/// Business logic layer
///
/// One service per resource; handlers stay thin. The fan-out sequences
/// (comment, reaction, follow, message) live here as plain sequential
/// repository calls — deliberately not transactional.
pub mod comments;
pub mod follows;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod reactions;
pub mod search;
pub mod stories;
pub mod text_parser;

pub use comments::CommentService;
pub use follows::FollowService;
pub use media::MediaStorage;
pub use messages::MessageService;
pub use notifications::NotificationService;
pub use posts::PostService;
pub use profiles::ProfileService;
pub use reactions::ReactionService;
pub use search::SearchService;
pub use stories::StoriesService;
