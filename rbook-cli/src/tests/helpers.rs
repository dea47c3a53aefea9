//! Test helpers building a small rally project on disk.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use tempfile::TempDir;

const SCHEMA: &str = "
    CREATE TABLE bonuses (
        BonusID TEXT PRIMARY KEY, BriefDesc TEXT, Points INTEGER, Flags TEXT,
        Notes TEXT, Cat1 INTEGER DEFAULT 0, Cat2 INTEGER DEFAULT 0,
        Cat3 INTEGER DEFAULT 0, Cat4 INTEGER DEFAULT 0, Cat5 INTEGER DEFAULT 0,
        Cat6 INTEGER DEFAULT 0, Cat7 INTEGER DEFAULT 0, Cat8 INTEGER DEFAULT 0,
        Cat9 INTEGER DEFAULT 0, Image TEXT, Waffle TEXT, Coords TEXT,
        Question TEXT, Answer TEXT, AskPoints INTEGER DEFAULT 0
    );
    CREATE TABLE combinations (
        ComboID TEXT PRIMARY KEY, BriefDesc TEXT, ScoreMethod INTEGER DEFAULT 0,
        MinimumTicks INTEGER DEFAULT 0, ScorePoints TEXT, Bonuses TEXT,
        Cat1 INTEGER DEFAULT 0, Cat2 INTEGER DEFAULT 0, Cat3 INTEGER DEFAULT 0,
        Cat4 INTEGER DEFAULT 0, Cat5 INTEGER DEFAULT 0, Cat6 INTEGER DEFAULT 0,
        Cat7 INTEGER DEFAULT 0, Cat8 INTEGER DEFAULT 0, Cat9 INTEGER DEFAULT 0,
        Compulsory INTEGER DEFAULT 0
    );
    CREATE TABLE entrants (
        EntrantID INTEGER PRIMARY KEY, RiderName TEXT, PillionName TEXT,
        Bike TEXT, BikeReg TEXT, OdoKms INTEGER DEFAULT 0, Cohort INTEGER DEFAULT 0
    );
    INSERT INTO bonuses (BonusID, BriefDesc, Points, Flags, Coords)
        VALUES ('B1', 'Severn Bridge', 10, 'R', '51.61 -2.64');
    INSERT INTO bonuses (BonusID, BriefDesc, Points, Flags, Coords)
        VALUES ('B2', 'Tintern Abbey', 20, '', '51.697 -2.677');
    INSERT INTO bonuses (BonusID, BriefDesc, Points)
        VALUES ('B3', 'Offa''s Dyke', 30);
";

/// A rally project in a temporary directory: templates, database and book
/// configuration.
#[derive(Debug)]
pub(super) struct Project {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 tempdir");
        let project = Self { _dir: dir, root };
        project.write("templates/cover.html", "<h1>{{Title}}</h1>\n");
        project.write(
            "templates/bonuses.html",
            "<div class=\"bonus\">{{BonusID}} {{BriefDesc}}{{#if AlertR}} (restricted){{/if}}</div>\n",
        );
        let connection = Connection::open(project.database()).expect("create database");
        connection.execute_batch(SCHEMA).expect("create schema");
        project
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("rally.db")
    }

    pub(super) fn config_path(&self) -> Utf8PathBuf {
        self.root.join("rbook.yml")
    }

    pub(super) fn write(&self, relative: &str, body: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(path, body).expect("write project file");
    }

    /// Write a book configuration naming this project's folders.
    pub(super) fn write_config(&self, with_database: bool) {
        let database = if with_database {
            format!("database: {}\n", self.database())
        } else {
            String::new()
        };
        let yaml = format!(
            "title: Test Rally\n\
             projectFolder: {root}/templates\n\
             outputFolder: {root}/out\n\
             rallybookFile: book.html\n\
             {database}\
             sections: [cover, stream.bonuses]\n\
             streams:\n  \
               - streamid: bonuses\n    \
                 maxperline: 2\n    \
                 linesperpage: 2\n    \
                 brperline: 1\n    \
                 gpx: true\n\
             generateGPX:\n  \
               outputGPX: bonuses.gpx\n",
            root = self.root,
        );
        self.write("rbook.yml", &yaml);
    }
}
