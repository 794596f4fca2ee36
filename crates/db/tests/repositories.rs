//! Repository tests against a migrated database.
//!
//! Each test gets a freshly migrated database from `#[sqlx::test]`, which
//! connects through `DATABASE_URL`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use yamdb_core::confirmation::hash_code;
use yamdb_core::roles::{ROLE_ADMIN, ROLE_USER};
use yamdb_db::models::comment::CreateComment;
use yamdb_db::models::review::{CreateReview, UpdateReview};
use yamdb_db::models::taxonomy::{CreateTerm, Taxonomy};
use yamdb_db::models::title::{CreateTitle, TitleFilter, UpdateTitle};
use yamdb_db::models::user::{CreateUser, UpdateUser, User};
use yamdb_db::repositories::{CommentRepo, ReviewRepo, TaxonomyRepo, TitleRepo, UserRepo};

async fn user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            role: ROLE_USER.to_string(),
            ..CreateUser::default()
        },
    )
    .await
    .unwrap()
}

async fn term(pool: &PgPool, taxonomy: Taxonomy, name: &str, slug: &str) -> i64 {
    let input = CreateTerm {
        name: name.to_string(),
        slug: slug.to_string(),
    };
    TaxonomyRepo::create(pool, taxonomy, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_hits_named_constraint(pool: PgPool) {
    user(&pool, "reader").await;

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "reader".into(),
            email: "another@test.com".into(),
            role: ROLE_USER.into(),
            ..CreateUser::default()
        },
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirmation_code_is_consumed_once(pool: PgPool) {
    let reader = user(&pool, "reader").await;
    let hash = hash_code("ABCDEFGHIJKLMNOP");
    UserRepo::set_confirmation_code_hash(&pool, reader.id, &hash)
        .await
        .unwrap();

    assert!(!UserRepo::consume_confirmation_code(&pool, reader.id, &hash_code("WRONGWRONGWRONGW"))
        .await
        .unwrap());
    assert!(UserRepo::consume_confirmation_code(&pool, reader.id, &hash).await.unwrap());
    assert!(!UserRepo::consume_confirmation_code(&pool, reader.id, &hash).await.unwrap());

    let stored = UserRepo::find_by_id(&pool, reader.id).await.unwrap().unwrap();
    assert!(stored.confirmation_code_hash.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_update_search_and_superuser(pool: PgPool) {
    let reader = user(&pool, "reader").await;
    user(&pool, "writer").await;

    let updated = UserRepo::update(
        &pool,
        reader.id,
        &UpdateUser {
            bio: Some("Hello".into()),
            ..UpdateUser::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.bio, "Hello");
    assert_eq!(updated.username, "reader");

    assert_eq!(UserRepo::count(&pool, Some("READ")).await.unwrap(), 1);
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 2);

    let root = UserRepo::ensure_superuser(&pool, "reader", "reader@test.com")
        .await
        .unwrap();
    assert_eq!(root.id, reader.id);
    assert_eq!(root.role, ROLE_ADMIN);
    assert!(root.is_superuser);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ensure_superuser_takes_configured_email(pool: PgPool) {
    let existing = user(&pool, "root").await;
    assert_eq!(existing.email, "root@test.com");

    let root = UserRepo::ensure_superuser(&pool, "root", "ops@test.com")
        .await
        .unwrap();
    assert_eq!(root.id, existing.id);
    assert_eq!(root.email, "ops@test.com");
    assert!(root.is_superuser);

    let fresh = UserRepo::ensure_superuser(&pool, "owner", "owner@test.com")
        .await
        .unwrap();
    assert_eq!(fresh.role, ROLE_ADMIN);
    assert!(fresh.is_superuser);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ensure_superuser_email_of_other_user_conflicts(pool: PgPool) {
    let someone = user(&pool, "someone").await;

    let err = UserRepo::ensure_superuser(&pool, "root", &someone.email)
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_email"));

    let untouched = UserRepo::find_by_username(&pool, "someone")
        .await
        .unwrap()
        .unwrap();
    assert!(!untouched.is_superuser);
}

// ---------------------------------------------------------------------------
// Titles and reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_genres_rating_and_filters(pool: PgPool) {
    let films = term(&pool, Taxonomy::Category, "Films", "films").await;
    let drama = term(&pool, Taxonomy::Genre, "Drama", "drama").await;
    let scifi = term(&pool, Taxonomy::Genre, "Sci-fi", "sci-fi").await;

    let title = TitleRepo::create(
        &pool,
        &CreateTitle {
            name: "Solaris".into(),
            year: 1972,
            description: None,
            category_id: Some(films),
            genre_ids: vec![drama, scifi],
        },
    )
    .await
    .unwrap();
    assert_eq!(title.genre.len(), 2);
    assert_eq!(title.category.as_ref().map(|c| c.slug.as_str()), Some("films"));
    assert_eq!(title.rating, None);

    for (name, score) in [("a", 9), ("b", 6)] {
        let author = user(&pool, name).await;
        ReviewRepo::create(
            &pool,
            &CreateReview {
                title_id: title.id,
                author_id: author.id,
                text: "Review".into(),
                score,
            },
        )
        .await
        .unwrap();
    }
    let title = TitleRepo::find_by_id(&pool, title.id).await.unwrap().unwrap();
    assert_eq!(title.rating, Some(7.5));

    let filter = TitleFilter {
        genre: Some("sci-fi".into()),
        ..TitleFilter::default()
    };
    assert_eq!(TitleRepo::count(&pool, &filter).await.unwrap(), 1);

    let updated = TitleRepo::update(
        &pool,
        title.id,
        &UpdateTitle {
            genre_ids: Some(vec![drama]),
            ..UpdateTitle::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.genre.len(), 1);
    assert_eq!(TitleRepo::count(&pool, &filter).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_uniqueness_and_cascade(pool: PgPool) {
    let title = TitleRepo::create(
        &pool,
        &CreateTitle {
            name: "Stalker".into(),
            year: 1979,
            description: None,
            category_id: None,
            genre_ids: Vec::new(),
        },
    )
    .await
    .unwrap();
    let author = user(&pool, "author").await;
    let input = CreateReview {
        title_id: title.id,
        author_id: author.id,
        text: "Slow and great".into(),
        score: 10,
    };

    let review = ReviewRepo::create(&pool, &input).await.unwrap();
    assert_eq!(review.author, "author");
    assert!(ReviewRepo::exists_for_author(&pool, title.id, author.id).await.unwrap());

    let err = ReviewRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_reviews_author_title"));

    let updated = ReviewRepo::update(
        &pool,
        review.id,
        &UpdateReview {
            score: Some(8),
            ..UpdateReview::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.score, 8);
    assert_eq!(updated.text, "Slow and great");

    CommentRepo::create(
        &pool,
        &CreateComment {
            review_id: review.id,
            author_id: author.id,
            text: "Self-reply".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(CommentRepo::count_for_review(&pool, review.id).await.unwrap(), 1);

    assert!(TitleRepo::delete(&pool, title.id).await.unwrap());
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
