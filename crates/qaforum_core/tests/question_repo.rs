use qaforum_core::db::open_db_in_memory;
use qaforum_core::{
    EntityKind, Question, QuestionRepository, Reply, ReplyRepository, RepoError,
    SqliteQuestionRepository, SqliteReplyRepository, SqliteUserRepository, User, UserRepository,
};
use rusqlite::{params, Connection};

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn save_users(conn: &Connection, count: usize) -> Vec<User> {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    (0..count)
        .map(|idx| {
            let mut user = User::new(format!("user{idx}"), "Tester");
            repo.save(&mut user).unwrap();
            user
        })
        .collect()
}

fn save_question(conn: &Connection, title: &str, author: &User) -> Question {
    let mut question = Question::new(title, "body", author.id.unwrap());
    SqliteQuestionRepository::try_new(conn)
        .unwrap()
        .save(&mut question)
        .unwrap();
    question
}

fn link(conn: &Connection, table: &str, question: &Question, users: &[&User]) {
    for user in users {
        conn.execute(
            &format!("INSERT INTO {table} (question_id, user_id) VALUES (?1, ?2);"),
            params![question.id.unwrap(), user.id.unwrap()],
        )
        .unwrap();
    }
}

#[test]
fn save_then_find_by_id_returns_identical_fields() {
    let conn = setup();
    let users = save_users(&conn, 1);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let mut question = Question::new("How?", "Explain borrowing", users[0].id.unwrap());
    let id = repo.save(&mut question).unwrap();

    assert_eq!(repo.find_by_id(id).unwrap(), Some(question));
    assert!(repo.find_by_id(id + 1).unwrap().is_none());
}

#[test]
fn save_on_persisted_question_rewrites_title_body_and_author() {
    let conn = setup();
    let users = save_users(&conn, 2);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let mut first = save_question(&conn, "First", &users[0]);
    let second = save_question(&conn, "Second", &users[0]);

    first.title = "First, edited".to_string();
    first.body = "new body".to_string();
    first.user_id = users[1].id.unwrap();
    repo.save(&mut first).unwrap();

    assert_eq!(repo.find_by_id(first.id.unwrap()).unwrap(), Some(first));
    assert_eq!(repo.find_by_id(second.id.unwrap()).unwrap(), Some(second));
}

#[test]
fn save_rejects_unknown_author_through_foreign_key() {
    let conn = setup();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let mut orphan = Question::new("Orphan", "no author", 404);
    let err = repo.save(&mut orphan).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(orphan.id, None);
}

#[test]
fn find_by_author_id_lists_only_that_authors_questions() {
    let conn = setup();
    let users = save_users(&conn, 2);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let q1 = save_question(&conn, "Q1", &users[0]);
    save_question(&conn, "Q2", &users[1]);
    let q3 = save_question(&conn, "Q3", &users[0]);

    assert_eq!(
        repo.find_by_author_id(users[0].id.unwrap()).unwrap(),
        vec![q1, q3]
    );
    assert!(repo.find_by_author_id(999).unwrap().is_empty());
}

#[test]
fn replies_followers_and_likers_are_loaded_on_demand() {
    let conn = setup();
    let users = save_users(&conn, 3);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let question = save_question(&conn, "Q", &users[0]);
    let other = save_question(&conn, "Other", &users[0]);

    let mut reply = Reply::new("r", question.id.unwrap(), users[1].id.unwrap());
    SqliteReplyRepository::try_new(&conn)
        .unwrap()
        .save(&mut reply)
        .unwrap();
    link(&conn, "question_follows", &question, &[&users[1], &users[2]]);
    link(&conn, "question_likes", &question, &[&users[2]]);

    assert_eq!(repo.replies(&question).unwrap(), vec![reply]);
    assert_eq!(
        repo.followers(&question).unwrap(),
        vec![users[1].clone(), users[2].clone()]
    );
    assert_eq!(repo.likers(&question).unwrap(), vec![users[2].clone()]);
    assert!(repo.replies(&other).unwrap().is_empty());
    assert!(repo.followers(&other).unwrap().is_empty());
}

#[test]
fn num_likes_is_zero_without_likes_and_counts_rows_otherwise() {
    let conn = setup();
    let users = save_users(&conn, 4);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let liked = save_question(&conn, "Liked", &users[0]);
    let ignored = save_question(&conn, "Ignored", &users[0]);

    link(&conn, "question_likes", &liked, &[&users[1], &users[2], &users[3]]);

    assert_eq!(repo.num_likes(&liked).unwrap(), 3);
    assert_eq!(repo.num_likes(&ignored).unwrap(), 0);
}

#[test]
fn most_liked_orders_by_like_count_not_user_id_sum() {
    let conn = setup();
    let users = save_users(&conn, 5);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let single_high_id = save_question(&conn, "one like from user 5", &users[0]);
    let two_low_ids = save_question(&conn, "two likes from users 1 and 2", &users[0]);
    save_question(&conn, "never liked", &users[0]);

    // Summing user ids would rank the first question higher (5 > 1 + 2).
    link(&conn, "question_likes", &single_high_id, &[&users[4]]);
    link(&conn, "question_likes", &two_low_ids, &[&users[0], &users[1]]);

    let ranked = repo.most_liked(10).unwrap();
    assert_eq!(ranked, vec![two_low_ids.clone(), single_high_id]);
    assert_eq!(repo.most_liked(1).unwrap(), vec![two_low_ids]);
    assert!(repo.most_liked(0).unwrap().is_empty());
}

#[test]
fn most_followed_returns_at_most_n_and_breaks_ties_by_id() {
    let conn = setup();
    let users = save_users(&conn, 3);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let q1 = save_question(&conn, "Q1", &users[0]);
    let q2 = save_question(&conn, "Q2", &users[0]);
    let q3 = save_question(&conn, "Q3", &users[0]);

    link(&conn, "question_follows", &q1, &[&users[0]]);
    link(&conn, "question_follows", &q2, &[&users[0], &users[1], &users[2]]);
    link(&conn, "question_follows", &q3, &[&users[1]]);

    assert_eq!(repo.most_followed(2).unwrap(), vec![q2.clone(), q1.clone()]);
    assert_eq!(repo.most_followed(5).unwrap(), vec![q2, q1, q3]);
}

#[test]
fn accessors_reject_transient_question() {
    let conn = setup();
    let users = save_users(&conn, 1);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let transient = Question::new("draft", "body", users[0].id.unwrap());

    assert!(matches!(
        repo.num_likes(&transient),
        Err(RepoError::NotPersisted(EntityKind::Question))
    ));
    assert!(matches!(
        repo.replies(&transient),
        Err(RepoError::NotPersisted(EntityKind::Question))
    ));
    assert_eq!(repo.author(&transient).unwrap(), Some(users[0].clone()));
}
