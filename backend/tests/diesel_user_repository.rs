//! `DieselUserRepository` against embedded PostgreSQL.

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::PgContext;
use recipe_backend::domain::ports::{UserPersistenceError, UserRepository};
use recipe_backend::domain::{
    EmailAddress, EntityId, Password, User, UserExtras, UserId, UserName,
};
use recipe_backend::outbound::persistence::DieselUserRepository;
use rstest::{fixture, rstest};

#[fixture]
fn context() -> Option<PgContext> {
    pg_embed::pg_context()
}

fn password(raw: &str) -> Password {
    Password::new(raw).expect("password")
}

#[rstest]
fn inserted_users_are_found_by_id_and_email(context: Option<PgContext>) {
    let Some(ctx) = context else { return };
    let repo = DieselUserRepository::new(ctx.pool());
    let user = User::create_superuser(Some("chef@example.com"), &password("secret-pass"))
        .expect("user");

    ctx.block_on(repo.insert(&user)).expect("insert");

    let by_id = ctx
        .block_on(repo.find_by_id(user.id()))
        .expect("find by id")
        .expect("stored user");
    assert_eq!(by_id.email(), user.email());
    assert!(by_id.is_staff() && by_id.is_superuser() && by_id.is_active());
    assert!(by_id.check_password("secret-pass"));

    let email = EmailAddress::normalize("chef@example.com").expect("email");
    let by_email = ctx
        .block_on(repo.find_by_email(&email))
        .expect("find by email")
        .expect("stored user");
    assert_eq!(by_email.id(), user.id());
}

#[rstest]
fn emails_differing_only_in_domain_case_collide(context: Option<PgContext>) {
    let Some(ctx) = context else { return };
    let repo = DieselUserRepository::new(ctx.pool());
    ctx.insert_user("cook@example.com");
    let twin = User::create(
        Some("cook@EXAMPLE.com"),
        &password("other-pass"),
        UserExtras::default(),
    )
    .expect("user");

    let err = ctx
        .block_on(repo.insert(&twin))
        .expect_err("duplicate email");

    assert_eq!(err, UserPersistenceError::duplicate_email("cook@example.com"));
    assert_eq!(
        ctx.block_on(repo.find_by_id(twin.id())).expect("lookup"),
        None
    );
}

#[rstest]
fn updates_persist_name_and_password(context: Option<PgContext>) {
    let Some(ctx) = context else { return };
    let repo = DieselUserRepository::new(ctx.pool());
    let id = ctx.insert_user("baker@example.com");
    let mut user = ctx
        .block_on(repo.find_by_id(&id))
        .expect("lookup")
        .expect("stored user");

    user.rename(UserName::new("Baker").expect("name"));
    user.set_password(&password("new-secret")).expect("hash");
    ctx.block_on(repo.update(&user)).expect("update");

    let stored = ctx
        .block_on(repo.find_by_id(&id))
        .expect("lookup")
        .expect("stored user");
    assert_eq!(stored.name().as_ref(), "Baker");
    assert!(stored.check_password("new-secret"));
    assert!(!stored.check_password("secret-pass"));
}

#[rstest]
fn updating_an_unknown_user_is_a_query_error(context: Option<PgContext>) {
    let Some(ctx) = context else { return };
    let repo = DieselUserRepository::new(ctx.pool());
    let ghost = User::create(
        Some("ghost@example.com"),
        &password("secret-pass"),
        UserExtras::default(),
    )
    .expect("user");

    let err = ctx.block_on(repo.update(&ghost)).expect_err("no row");

    assert!(matches!(err, UserPersistenceError::Query { .. }));
}

#[rstest]
fn unknown_ids_and_emails_are_absent(context: Option<PgContext>) {
    let Some(ctx) = context else { return };
    let repo = DieselUserRepository::new(ctx.pool());
    let email = EmailAddress::normalize("nobody@example.com").expect("email");

    assert_eq!(
        ctx.block_on(repo.find_by_id(&UserId::random()))
            .expect("lookup"),
        None
    );
    assert_eq!(
        ctx.block_on(repo.find_by_email(&email)).expect("lookup"),
        None
    );
}
