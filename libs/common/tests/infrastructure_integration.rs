//! Integration tests for the PostgreSQL repositories
//!
//! These need a reachable database in `DATABASE_URL` and are ignored by
//! default; run them with `cargo test -p common -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    models::{NewComment, NewImage, NewUser},
    repositories::{Repositories, constraints},
};
use uuid::Uuid;

async fn repositories() -> Result<Repositories, Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");
    run_migrations(&pool).await?;
    Ok(Repositories::postgres(pool))
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_round_trip_and_unique_email() -> Result<(), Box<dyn std::error::Error>> {
    let repos = repositories().await?;
    let email = unique_email();
    let new_user = NewUser {
        username: "integration".to_string(),
        email: email.clone(),
        password_hash: "not-a-real-hash".to_string(),
    };

    let id = repos.users.create(&new_user).await?;
    let found = repos.users.find_by_email(&email).await?.expect("user exists");
    assert_eq!(found.id, id);
    assert_eq!(found.bio, None);

    let err = repos.users.create(&new_user).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::USERS_EMAIL_KEY));

    let mut changed = found.clone();
    changed.bio = Some("integration bio".to_string());
    assert!(repos.users.update(&changed).await?);
    let reloaded = repos.users.find_by_id(id).await?.expect("user exists");
    assert_eq!(reloaded.bio.as_deref(), Some("integration bio"));
    assert_eq!(reloaded.username, "integration");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_images_and_comments_enforce_references() -> Result<(), Box<dyn std::error::Error>>
{
    let repos = repositories().await?;

    let err = repos
        .images
        .create(&NewImage {
            user_id: Uuid::new_v4(),
            title: "orphan".to_string(),
            author: None,
            description: None,
            url: "https://example.com/orphan.png".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::IMAGES_USER_ID_FKEY));

    let user_id = repos
        .users
        .create(&NewUser {
            username: "commenter".to_string(),
            email: unique_email(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await?;

    let err = repos
        .comments
        .create(&NewComment {
            user_id,
            image_id: Uuid::new_v4(),
            content: "hello".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::COMMENTS_IMAGE_ID_FKEY));

    let image_id = repos
        .images
        .create(&NewImage {
            user_id,
            title: "sunset".to_string(),
            author: Some("me".to_string()),
            description: None,
            url: "https://example.com/sunset.png".to_string(),
        })
        .await?;
    repos
        .comments
        .create(&NewComment {
            user_id,
            image_id,
            content: "nice".to_string(),
        })
        .await?;

    let comments = repos.comments.find_by_image_id(image_id).await?;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].username, "commenter");

    assert_eq!(repos.images.adjust_likes(image_id, -1).await?, Some(0));
    assert_eq!(repos.images.adjust_likes(image_id, 1).await?, Some(1));

    Ok(())
}
