//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod actor_repo;
pub mod movie_repo;
pub mod playlist_repo;
pub mod review_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use actor_repo::ActorRepo;
pub use movie_repo::MovieRepo;
pub use playlist_repo::PlaylistRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
