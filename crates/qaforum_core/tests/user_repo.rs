use qaforum_core::db::open_db_in_memory;
use qaforum_core::{
    EntityKind, Question, QuestionRepository, Reply, ReplyRepository, RepoError,
    SqliteQuestionRepository, SqliteReplyRepository, SqliteUserRepository, User, UserRepository,
};
use rusqlite::{params, Connection};

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn save_user(conn: &Connection, fname: &str, lname: &str) -> User {
    let mut user = User::new(fname, lname);
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .save(&mut user)
        .unwrap();
    user
}

fn save_question(conn: &Connection, title: &str, author: &User) -> Question {
    let mut question = Question::new(title, format!("{title} body"), author.id.unwrap());
    SqliteQuestionRepository::try_new(conn)
        .unwrap()
        .save(&mut question)
        .unwrap();
    question
}

fn like(conn: &Connection, question: &Question, user: &User) {
    conn.execute(
        "INSERT INTO question_likes (question_id, user_id) VALUES (?1, ?2);",
        params![question.id.unwrap(), user.id.unwrap()],
    )
    .unwrap();
}

fn follow(conn: &Connection, question: &Question, user: &User) {
    conn.execute(
        "INSERT INTO question_follows (question_id, user_id) VALUES (?1, ?2);",
        params![question.id.unwrap(), user.id.unwrap()],
    )
    .unwrap();
}

#[test]
fn save_assigns_fresh_id_and_find_by_id_roundtrips() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut ada = User::new("Ada", "Lovelace");
    let ada_id = repo.save(&mut ada).unwrap();
    let mut alan = User::new("Alan", "Turing");
    let alan_id = repo.save(&mut alan).unwrap();

    assert_eq!(ada.id, Some(ada_id));
    assert_ne!(ada_id, alan_id);

    let loaded = repo.find_by_id(ada_id).unwrap().unwrap();
    assert_eq!(loaded, ada);
}

#[test]
fn find_by_id_returns_none_for_missing_row() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_id(42).unwrap().is_none());
}

#[test]
fn save_on_persisted_user_updates_only_that_row() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let mut ada = save_user(&conn, "Ada", "Lovelace");
    let alan = save_user(&conn, "Alan", "Turing");

    ada.lname = "King".to_string();
    let id = repo.save(&mut ada).unwrap();
    assert_eq!(Some(id), ada.id);

    assert_eq!(repo.find_by_id(id).unwrap().unwrap().lname, "King");
    assert_eq!(repo.find_by_id(alan.id.unwrap()).unwrap().unwrap(), alan);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn save_with_unknown_id_returns_not_found() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut ghost = User::new("No", "Body");
    ghost.id = Some(999);
    let err = repo.save(&mut ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::User,
            id: 999
        }
    ));
}

#[test]
fn find_by_name_matches_both_parts_exactly() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let ada = save_user(&conn, "Ada", "Lovelace");
    save_user(&conn, "Ada", "Byron");
    save_user(&conn, "Augusta", "Lovelace");

    let found = repo.find_by_name("Ada", "Lovelace").unwrap();
    assert_eq!(found, vec![ada]);
    assert!(repo.find_by_name("ada", "lovelace").unwrap().is_empty());
}

#[test]
fn find_by_name_binds_values_instead_of_interpolating() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    save_user(&conn, "Ada", "Lovelace");

    let found = repo.find_by_name("x' OR '1'='1", "y' OR '1'='1").unwrap();
    assert!(found.is_empty());
}

#[test]
fn authored_questions_and_replies_follow_user_id() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let ada = save_user(&conn, "Ada", "Lovelace");
    let alan = save_user(&conn, "Alan", "Turing");
    let q1 = save_question(&conn, "Q1", &ada);
    let q2 = save_question(&conn, "Q2", &ada);
    let q3 = save_question(&conn, "Q3", &alan);

    let mut reply = Reply::new("answer", q3.id.unwrap(), ada.id.unwrap());
    SqliteReplyRepository::try_new(&conn)
        .unwrap()
        .save(&mut reply)
        .unwrap();

    assert_eq!(repo.authored_questions(&ada).unwrap(), vec![q1, q2]);
    assert_eq!(repo.authored_replies(&ada).unwrap(), vec![reply]);
    assert!(repo.authored_replies(&alan).unwrap().is_empty());
}

#[test]
fn followed_and_liked_questions_go_through_associations() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let ada = save_user(&conn, "Ada", "Lovelace");
    let alan = save_user(&conn, "Alan", "Turing");
    let q1 = save_question(&conn, "Q1", &ada);
    let q2 = save_question(&conn, "Q2", &ada);

    follow(&conn, &q2, &alan);
    like(&conn, &q1, &alan);
    like(&conn, &q2, &alan);

    assert_eq!(repo.followed_questions(&alan).unwrap(), vec![q2.clone()]);
    assert_eq!(repo.liked_questions(&alan).unwrap(), vec![q1, q2]);
    assert!(repo.followed_questions(&ada).unwrap().is_empty());
}

#[test]
fn average_karma_divides_likes_by_authored_questions() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let ada = save_user(&conn, "Ada", "Lovelace");
    let alan = save_user(&conn, "Alan", "Turing");
    let grace = save_user(&conn, "Grace", "Hopper");
    let q1 = save_question(&conn, "Q1", &ada);
    let q2 = save_question(&conn, "Q2", &ada);
    save_question(&conn, "Q3", &alan);

    like(&conn, &q1, &alan);
    like(&conn, &q1, &grace);
    like(&conn, &q2, &grace);

    assert_eq!(repo.average_karma(&ada).unwrap(), Some(1.5));
    assert_eq!(repo.average_karma(&alan).unwrap(), Some(0.0));
}

#[test]
fn average_karma_is_none_without_authored_questions() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let lurker = save_user(&conn, "Lurk", "Er");

    assert_eq!(repo.average_karma(&lurker).unwrap(), None);
}

#[test]
fn accessors_reject_transient_user() {
    let conn = setup();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let transient = User::new("Not", "Saved");

    assert!(matches!(
        repo.authored_questions(&transient),
        Err(RepoError::NotPersisted(EntityKind::User))
    ));
    assert!(matches!(
        repo.average_karma(&transient),
        Err(RepoError::NotPersisted(EntityKind::User))
    ));
}

#[test]
fn question_author_resolves_back_to_user() {
    let conn = setup();
    let ada = save_user(&conn, "Ada", "Lovelace");
    let question = save_question(&conn, "Q1", &ada);

    let questions = SqliteQuestionRepository::try_new(&conn).unwrap();
    assert_eq!(questions.author(&question).unwrap(), Some(ada));
}

#[test]
fn user_serializes_without_id_until_saved() {
    let conn = setup();
    let mut user = User::new("Ada", "Lovelace");
    let transient = serde_json::to_value(&user).unwrap();
    assert_eq!(
        transient,
        serde_json::json!({ "fname": "Ada", "lname": "Lovelace" })
    );

    SqliteUserRepository::try_new(&conn)
        .unwrap()
        .save(&mut user)
        .unwrap();
    let persisted = serde_json::to_value(&user).unwrap();
    assert_eq!(persisted["id"], serde_json::json!(user.id.unwrap()));

    let decoded: User = serde_json::from_value(transient).unwrap();
    assert_eq!(decoded.id, None);
}
