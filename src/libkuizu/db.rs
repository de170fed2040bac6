use crate::libkuizu::deck::Deck;
use crate::libkuizu::error::Error;
use crate::libkuizu::shitsumon::{Answer, Question};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result, Row};
use std::path::Path;
use std::time::Instant;

struct QuestionRow {
    id: i64,
    prompt: String,
}

impl QuestionRow {
    fn from_row(row: &Row) -> Result<QuestionRow> {
        Ok(QuestionRow {
            id: row.get(0)?,
            prompt: row.get(1)?,
        })
    }
}

fn answer_from_row(row: &Row) -> Result<Answer> {
    Ok(Answer::new(row.get::<usize, String>(0)?, row.get(1)?))
}

impl Deck {
    /// Stores the deck, replacing any deck with the same name.
    pub fn save(&self, connection: &mut Connection) -> Result<()> {
        let now = Instant::now();
        let tx = connection.transaction()?;
        delete_deck_rows(&tx, &self.name)?;
        tx.execute("INSERT INTO Deck(name) VALUES (?1)", params![self.name])?;

        for (position, question) in self.questions.iter().enumerate() {
            tx.execute(
                "INSERT INTO Question(deckName, position, prompt) VALUES (?1, ?2, ?3)",
                params![self.name, position as i64, question.prompt()],
            )?;
            let question_id = tx.last_insert_rowid();
            for (answer_position, answer) in question.answers().iter().enumerate() {
                tx.execute(
                    "INSERT INTO Answer(questionId, position, text, correct) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        question_id,
                        answer_position as i64,
                        answer.text(),
                        answer.is_correct()
                    ],
                )?;
            }
        }

        match tx.commit() {
            Ok(_) => {
                debug!(
                    "[DB] Saved Deck '{}' ({} questions) in {} ms.",
                    self.name,
                    self.questions.len(),
                    now.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!("[DB] Error while saving Deck '{}': {:?}", self.name, err);
                Err(err)
            }
        }
    }

    pub fn load(connection: &Connection, name: &str) -> Result<Deck, Error> {
        let now = Instant::now();
        let exists = connection
            .query_row(
                "SELECT name FROM Deck WHERE name = :name LIMIT 1",
                &[(":name", &name)],
                |row| row.get::<usize, String>(0),
            )
            .optional()?;
        if exists.is_none() {
            warn!("[DB] Deck '{}' does not exist.", name);
            return Err(Error::DeckNotFound(name.to_string()));
        }

        let mut statement = connection.prepare(
            "SELECT id, prompt FROM Question WHERE deckName = :name ORDER BY position",
        )?;
        let rows = statement
            .query_map(&[(":name", &name)], |row| QuestionRow::from_row(row))?
            .collect::<Result<Vec<_>>>()?;

        let mut answers_statement = connection.prepare(
            "SELECT text, correct FROM Answer WHERE questionId = :id ORDER BY position",
        )?;
        let mut questions = Vec::with_capacity(rows.len());
        for QuestionRow { id, prompt } in rows {
            let answers = answers_statement
                .query_map(&[(":id", &id)], |row| answer_from_row(row))?
                .collect::<Result<Vec<_>>>()?;
            questions.push(Question::new(prompt, answers));
        }

        debug!(
            "[DB] Loaded Deck '{}' ({} questions) in {} ms.",
            name,
            questions.len(),
            now.elapsed().as_millis()
        );
        Ok(Deck::new(name, questions))
    }

    pub fn delete(connection: &mut Connection, name: &str) -> Result<()> {
        let tx = connection.transaction()?;
        delete_deck_rows(&tx, name)?;
        tx.commit()?;
        debug!("[DB] Deleted Deck '{}'", name);
        Ok(())
    }
}

fn delete_deck_rows(connection: &Connection, name: &str) -> Result<()> {
    connection.execute(
        "DELETE FROM Answer WHERE questionId IN (SELECT id FROM Question WHERE deckName = ?1)",
        params![name],
    )?;
    connection.execute("DELETE FROM Question WHERE deckName = ?1", params![name])?;
    connection.execute("DELETE FROM Deck WHERE name = ?1", params![name])?;
    Ok(())
}

pub fn deck_names(connection: &Connection) -> Result<Vec<String>> {
    let mut statement = connection.prepare("SELECT name FROM Deck ORDER BY name")?;
    let rows = statement.query_map([], |row| row.get(0))?;

    rows.collect()
}

/// Loads `name`, or the first deck by name when `name` is `None`.
pub fn load_deck(connection: &Connection, name: Option<&str>) -> Result<Deck, Error> {
    match name {
        Some(name) => Deck::load(connection, name),
        None => match deck_names(connection)?.first() {
            Some(first) => {
                debug!("[Setup] Picked deck {:?}", first);
                Deck::load(connection, first)
            }
            None => Err(Error::NoDecks),
        },
    }
}

pub fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = init_db(Connection::open_in_memory()?)?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            close_db(db)?;
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            open_db(dest)
        }
        Err(err) => {
            warn!("Failed to create database file: {}", err);
            close_db(db)?;
            Err(err)
        }
    }
}

pub fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    match connection.close() {
        Ok(_) => Ok(()),
        Err((conn, _)) => {
            error!("[DB] Cannot close connection. Retrying...");
            conn.close().map_err(|(_, err)| {
                error!("[DB] Cannot close connection! Giving up.");
                err
            })
        }
    }
}

fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute(
        "CREATE TABLE Deck (
              name TEXT NOT NULL,
              PRIMARY KEY (name)
            )",
        (),
    )?;
    info!("[DB INIT] Created table Deck");
    conn.execute(
        "CREATE TABLE Question (
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              deckName TEXT NOT NULL,
              position INTEGER NOT NULL,
              prompt TEXT NOT NULL,
              FOREIGN KEY (deckName) REFERENCES Deck(name) ON DELETE CASCADE ON UPDATE CASCADE
            )",
        (),
    )?;
    info!("[DB INIT] Created table Question");
    conn.execute(
        "CREATE TABLE Answer (
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              questionId INTEGER NOT NULL,
              position INTEGER NOT NULL,
              text TEXT NOT NULL,
              correct INTEGER NOT NULL,
              FOREIGN KEY (questionId) REFERENCES Question(id) ON DELETE CASCADE
            )",
        (),
    )?;
    info!("[DB INIT] Created table Answer");
    conn.execute(
        "CREATE INDEX Question_deckName_idx ON Question(deckName, position)",
        (),
    )?;
    info!("[DB INIT] Created index Question_deckName_idx");
    conn.execute(
        "CREATE INDEX Answer_questionId_idx ON Answer(questionId, position)",
        (),
    )?;
    info!("[DB INIT] Created index Answer_questionId_idx");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}
