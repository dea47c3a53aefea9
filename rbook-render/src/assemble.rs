//! Section walk, stream dispatch and page-grid layout.

use std::collections::HashMap;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, error, info, warn};
use rbook_core::{
    BonusRecord, BookConfig, ComboRecord, EntrantRecord, Paginator, PointsPrefixes,
    RecordContext, RecordSource, Rows, Section, StreamConfig, StreamKind, StreamQuery,
};
use serde::Serialize;

use crate::document::{
    CONTAINER_CLOSE, DOCUMENT_FOOT, NOPAGE_OPEN, PAGE_OPEN, document_head, padding,
};
use crate::error::{AssembleError, RowError, SourceError, StreamError};
use crate::template::TemplateRenderer;
use crate::waypoints::GpxWaypointWriter;

/// Outcome of one rendered stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    /// Stream identifier.
    pub stream: String,
    /// Records written to the document.
    pub rendered: usize,
    /// Rows dropped by row-level errors.
    pub skipped: usize,
    /// Page containers split mid-stream.
    pub page_breaks: usize,
    /// Padding units closing the final page.
    pub padding: usize,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Streams that were rendered, in document order.
    pub streams: Vec<StreamReport>,
    /// Streams abandoned by a stream-level error.
    pub failed_streams: Vec<String>,
    /// Static sections written.
    pub static_sections: usize,
    /// Waypoints collected for the GPX file.
    pub waypoints: usize,
}

/// Result of [`DocumentAssembler::assemble`].
#[derive(Debug)]
pub struct Assembled<W> {
    /// The output writer, flushed.
    pub output: W,
    /// Collected waypoints, when GPX output was requested.
    pub waypoints: Option<GpxWaypointWriter>,
    /// What was written.
    pub report: AssemblyReport,
}

/// Files a run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTargets {
    /// The HTML document.
    pub document: Utf8PathBuf,
    /// The companion GPX file, if any.
    pub gpx: Option<Utf8PathBuf>,
}

/// Records laid out on the page grid.
trait GridRecord: Serialize {
    fn set_new_line(&mut self, new_line: bool);
    fn label(&self) -> String;
}

impl GridRecord for BonusRecord {
    fn set_new_line(&mut self, new_line: bool) {
        self.new_line = new_line;
    }

    fn label(&self) -> String {
        self.id.clone()
    }
}

impl GridRecord for ComboRecord {
    fn set_new_line(&mut self, new_line: bool) {
        self.new_line = new_line;
    }

    fn label(&self) -> String {
        self.id.clone()
    }
}

impl GridRecord for EntrantRecord {
    fn set_new_line(&mut self, new_line: bool) {
        self.new_line = new_line;
    }

    fn label(&self) -> String {
        self.id.to_string()
    }
}

/// Walks the configured sections and writes the rally book.
///
/// The assembler is the run context: it owns the template registry, the
/// output writer and the optional waypoint collector, and borrows the
/// configuration and record source.
pub struct DocumentAssembler<'a, S, W> {
    config: &'a BookConfig,
    source: &'a S,
    renderer: TemplateRenderer,
    output: W,
    waypoints: Option<GpxWaypointWriter>,
    prefixes: PointsPrefixes,
    titles: Option<HashMap<String, String>>,
    report: AssemblyReport,
}

impl<S, W> std::fmt::Debug for DocumentAssembler<'_, S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAssembler")
            .field("title", &self.config.title)
            .field("renderer", &self.renderer)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl<'a, S, W> DocumentAssembler<'a, S, W>
where
    S: RecordSource,
    W: Write,
{
    /// Prepare a run writing to `output`.
    #[must_use]
    pub fn new(config: &'a BookConfig, source: &'a S, output: W) -> Self {
        Self {
            config,
            source,
            renderer: TemplateRenderer::new(Utf8Path::new(&config.project_folder)),
            output,
            waypoints: None,
            prefixes: config.points_prefixes(),
            titles: None,
            report: AssemblyReport::default(),
        }
    }

    /// Collect waypoints from GPX-enabled streams.
    #[must_use]
    pub fn with_waypoints(mut self, waypoints: GpxWaypointWriter) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    /// Write the head, every section in order and the foot.
    ///
    /// # Errors
    /// Returns [`AssembleError`] when writing fails or a template exists but
    /// cannot be loaded. Stream and row failures are logged and skipped.
    pub fn assemble(mut self) -> Result<Assembled<W>, AssembleError> {
        let config = self.config;
        let project_css = self.project_stylesheet();
        self.output.write_all(
            document_head(&config.title, config.landscape, project_css.as_deref()).as_bytes(),
        )?;

        for section in config.sections() {
            match section {
                Section::Static(name) => self.emit_static(name)?,
                Section::Stream(id) => match config.stream(id) {
                    Some(stream) => self.emit_stream(stream)?,
                    None => warn!("section stream.{id} names no configured stream; skipping"),
                },
            }
        }

        self.output.write_all(DOCUMENT_FOOT.as_bytes())?;
        self.output.flush()?;
        self.report.waypoints = self.waypoints.as_ref().map_or(0, GpxWaypointWriter::len);
        Ok(Assembled {
            output: self.output,
            waypoints: self.waypoints,
            report: self.report,
        })
    }

    fn project_stylesheet(&self) -> Option<String> {
        let stylesheet = self.config.stylesheet.trim();
        if stylesheet.is_empty() {
            return None;
        }
        let path = Utf8Path::new(&self.config.project_folder).join(stylesheet);
        if !rbook_fs::regular_file_exists(&path) {
            debug!("no project stylesheet at {path}");
            return None;
        }
        match rbook_fs::read_utf8_to_string(&path) {
            Ok(css) => Some(css),
            Err(err) => {
                warn!("ignoring unreadable stylesheet {path}: {err}");
                None
            }
        }
    }

    fn emit_static(&mut self, name: &str) -> Result<(), AssembleError> {
        if !self.renderer.ensure_loaded(name)? {
            debug!("static section {name} has no template; skipping");
            return Ok(());
        }
        match self.renderer.render(name, self.config) {
            Ok(html) => {
                self.output.write_all(html.as_bytes())?;
                self.report.static_sections += 1;
            }
            Err(err) => error!("static section {name} failed to render: {err}"),
        }
        Ok(())
    }

    fn emit_stream(&mut self, stream: &StreamConfig) -> Result<(), AssembleError> {
        let outcome = match stream.kind {
            StreamKind::Static => return self.emit_static(stream.template_name()),
            StreamKind::Bonus => self.emit_bonuses(stream)?,
            StreamKind::Combo => self.emit_combos(stream)?,
            StreamKind::Entrant => self.emit_entrants(stream)?,
        };
        match outcome {
            Ok(report) => {
                info!(
                    "stream {}: {} record(s) rendered, {} skipped",
                    report.stream, report.rendered, report.skipped
                );
                self.report.streams.push(report);
            }
            Err(err) => {
                error!("{err}");
                self.report.failed_streams.push(stream.id.clone());
            }
        }
        Ok(())
    }

    /// Load the stream's template; a missing file abandons the stream.
    fn stream_template<'s>(
        &mut self,
        stream: &'s StreamConfig,
    ) -> Result<Result<&'s str, StreamError>, AssembleError> {
        let name = stream.template_name();
        if self.renderer.ensure_loaded(name)? {
            Ok(Ok(name))
        } else {
            Ok(Err(StreamError::MissingTemplate {
                stream: stream.id.clone(),
                path: self.renderer.path_for(name),
            }))
        }
    }

    fn context<'c>(&'c self, stream: &'c StreamConfig) -> RecordContext<'c> {
        RecordContext {
            stream_id: &stream.id,
            image_folder: &self.config.image_folder,
            prefixes: &self.prefixes,
        }
    }

    fn emit_bonuses(
        &mut self,
        stream: &StreamConfig,
    ) -> Result<Result<StreamReport, StreamError>, AssembleError> {
        let template = match self.stream_template(stream)? {
            Ok(template) => template,
            Err(err) => return Ok(Err(err)),
        };
        let rows = match self.source.bonuses(&StreamQuery::from(stream)) {
            Ok(rows) => rows,
            Err(err) => return Ok(Err(query_failed(stream, err))),
        };

        let mut report = new_report(stream);
        let context = self.context(stream);
        let records: Vec<BonusRecord> = scanned(stream, rows, &mut report)
            .map(|row| {
                let record = BonusRecord::new(row, &context);
                if let Some(source) = &record.coordinate_error {
                    let problem = RowError::Coordinates {
                        stream: stream.id.clone(),
                        record: record.id.clone(),
                        text: record.coords.clone(),
                        source: source.clone(),
                    };
                    if stream.gpx {
                        warn!("{problem}");
                    } else {
                        debug!("{problem}");
                    }
                }
                record
            })
            .collect();

        let mut waypoints = if stream.gpx {
            self.waypoints.as_mut()
        } else {
            None
        };
        let mut grid = Grid {
            renderer: &self.renderer,
            output: &mut self.output,
        };
        grid.lay_out(stream, template, records, &mut report, |record| {
            if let (Some(collector), Some(location)) = (waypoints.as_deref_mut(), record.location())
            {
                collector.add_waypoint(location, &record.id, &record.description, &record.points);
            }
        })?;
        Ok(Ok(report))
    }

    fn emit_combos(
        &mut self,
        stream: &StreamConfig,
    ) -> Result<Result<StreamReport, StreamError>, AssembleError> {
        let template = match self.stream_template(stream)? {
            Ok(template) => template,
            Err(err) => return Ok(Err(err)),
        };
        let rows = match self.source.combos(&StreamQuery::from(stream)) {
            Ok(rows) => rows,
            Err(err) => return Ok(Err(query_failed(stream, err))),
        };
        if self.titles.is_none() {
            match self.source.bonus_titles() {
                Ok(titles) => self.titles = Some(titles),
                Err(err) => {
                    return Ok(Err(StreamError::Titles {
                        stream: stream.id.clone(),
                        source: Box::new(err),
                    }));
                }
            }
        }

        let mut report = new_report(stream);
        let context = self.context(stream);
        let empty = HashMap::new();
        let titles = self.titles.as_ref().unwrap_or(&empty);
        let mut rejected = 0;
        let records: Vec<ComboRecord> = scanned(stream, rows, &mut report)
            .filter_map(|row| {
                let id = row.id.clone();
                ComboRecord::new(row, &context, titles)
                    .map_err(|source| {
                        rejected += 1;
                        warn!(
                            "{}",
                            RowError::Combo {
                                stream: stream.id.clone(),
                                record: id,
                                source,
                            }
                        );
                    })
                    .ok()
            })
            .collect();
        report.skipped += rejected;

        let mut grid = Grid {
            renderer: &self.renderer,
            output: &mut self.output,
        };
        grid.lay_out(stream, template, records, &mut report, |_| {})?;
        Ok(Ok(report))
    }

    fn emit_entrants(
        &mut self,
        stream: &StreamConfig,
    ) -> Result<Result<StreamReport, StreamError>, AssembleError> {
        let template = match self.stream_template(stream)? {
            Ok(template) => template,
            Err(err) => return Ok(Err(err)),
        };
        let rows = match self.source.entrants(&StreamQuery::from(stream)) {
            Ok(rows) => rows,
            Err(err) => return Ok(Err(query_failed(stream, err))),
        };

        let mut report = new_report(stream);
        let context = self.context(stream);
        let records: Vec<EntrantRecord> = scanned(stream, rows, &mut report)
            .map(|row| EntrantRecord::new(row, &context))
            .collect();

        let mut grid = Grid {
            renderer: &self.renderer,
            output: &mut self.output,
        };
        grid.lay_out(stream, template, records, &mut report, |_| {})?;
        Ok(Ok(report))
    }
}

fn new_report(stream: &StreamConfig) -> StreamReport {
    StreamReport {
        stream: stream.id.clone(),
        ..StreamReport::default()
    }
}

fn query_failed<E>(stream: &StreamConfig, err: E) -> StreamError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StreamError::Query {
        stream: stream.id.clone(),
        source: Box::new(err),
    }
}

/// Drop rows that failed to scan, logging each and counting it as skipped.
fn scanned<'r, T, E>(
    stream: &'r StreamConfig,
    rows: Rows<T, E>,
    report: &'r mut StreamReport,
) -> impl Iterator<Item = T> + 'r
where
    T: 'r,
    E: std::error::Error + Send + Sync + 'static,
{
    rows.into_iter()
        .enumerate()
        .filter_map(move |(index, result)| match result {
            Ok(row) => Some(row),
            Err(err) => {
                let source: SourceError = Box::new(err);
                warn!(
                    "{}",
                    RowError::Scan {
                        stream: stream.id.clone(),
                        index,
                        source,
                    }
                );
                report.skipped += 1;
                None
            }
        })
}

/// Writes one stream's records into page containers.
struct Grid<'g, W> {
    renderer: &'g TemplateRenderer,
    output: &'g mut W,
}

impl<W: Write> Grid<'_, W> {
    fn lay_out<T, F>(
        &mut self,
        stream: &StreamConfig,
        template: &str,
        records: Vec<T>,
        report: &mut StreamReport,
        mut on_rendered: F,
    ) -> std::io::Result<()>
    where
        T: GridRecord,
        F: FnMut(&T),
    {
        let mut paginator = Paginator::new(stream.layout());
        let open = if stream.no_page_top {
            NOPAGE_OPEN
        } else {
            PAGE_OPEN
        };
        self.output.write_all(open.as_bytes())?;

        for mut record in records {
            // A record that fails to render must not occupy a grid cell.
            let checkpoint = paginator.clone();
            let event = paginator.observe();
            record.set_new_line(event.new_line);
            match self.renderer.render(template, &record) {
                Ok(fragment) => {
                    if event.page_break {
                        self.output.write_all(CONTAINER_CLOSE.as_bytes())?;
                        self.output.write_all(PAGE_OPEN.as_bytes())?;
                        report.page_breaks += 1;
                    }
                    self.output.write_all(fragment.as_bytes())?;
                    report.rendered += 1;
                    on_rendered(&record);
                }
                Err(source) => {
                    paginator = checkpoint;
                    report.skipped += 1;
                    warn!(
                        "{}",
                        RowError::Render {
                            stream: stream.id.clone(),
                            record: record.label(),
                            source: Box::new(source),
                        }
                    );
                }
            }
        }

        let units = paginator.finish();
        report.padding = units;
        self.output.write_all(padding(units).as_bytes())?;
        self.output.write_all(CONTAINER_CLOSE.as_bytes())?;
        Ok(())
    }
}

/// Render the book to `targets.document` and, when requested, the GPX file.
///
/// # Errors
/// Returns [`AssembleError`] when an output file cannot be created or
/// written, or a template cannot be loaded.
pub fn render_book<S: RecordSource>(
    config: &BookConfig,
    source: &S,
    targets: &OutputTargets,
) -> Result<AssemblyReport, AssembleError> {
    info!("generating {} for '{}'", targets.document, config.title);
    let document = rbook_fs::create_utf8_file(&targets.document).map_err(|err| {
        AssembleError::CreateOutput {
            path: targets.document.clone(),
            source: err,
        }
    })?;
    let mut assembler = DocumentAssembler::new(config, source, BufWriter::new(document));
    if targets.gpx.is_some() {
        assembler = assembler.with_waypoints(GpxWaypointWriter::new(
            &config.generate_gpx,
            &config.title,
        ));
    }
    let assembled = assembler.assemble()?;

    if let (Some(path), Some(waypoints)) = (&targets.gpx, assembled.waypoints) {
        let gpx_file = rbook_fs::create_utf8_file(path).map_err(|err| {
            AssembleError::CreateOutput {
                path: path.clone(),
                source: err,
            }
        })?;
        let mut writer = BufWriter::new(gpx_file);
        waypoints.write(&mut writer)?;
        writer.flush()?;
        info!("wrote {} waypoint(s) to {path}", assembled.report.waypoints);
    }
    Ok(assembled.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbook_core::test_support::MemoryRecordSource;
    use rbook_core::{ComboRow, EntrantRow};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Project {
        _dir: TempDir,
        folder: Utf8PathBuf,
    }

    impl Project {
        fn write(&self, name: &str, body: &str) {
            std::fs::write(self.folder.join(name), body).expect("write project file");
        }

        fn config(&self, sections: &[&str], streams: Vec<StreamConfig>) -> BookConfig {
            BookConfig {
                title: String::from("Brit Butt"),
                description: String::from("Twelve hours, one island"),
                project_folder: self.folder.to_string(),
                sections: sections.iter().map(|name| (*name).to_owned()).collect(),
                streams,
                ..BookConfig::default()
            }
        }
    }

    #[fixture]
    fn project() -> Project {
        let dir = TempDir::new().expect("create temp dir");
        let folder =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp path is UTF-8");
        Project { _dir: dir, folder }
    }

    fn stream(id: &str, kind: StreamKind) -> StreamConfig {
        StreamConfig {
            id: id.to_owned(),
            kind,
            ..StreamConfig::default()
        }
    }

    fn assemble(config: &BookConfig, source: &MemoryRecordSource) -> (String, AssemblyReport) {
        let assembled = DocumentAssembler::new(config, source, Vec::new())
            .assemble()
            .expect("assembly succeeds");
        let document = String::from_utf8(assembled.output).expect("document is UTF-8");
        (document, assembled.report)
    }

    #[rstest]
    fn static_sections_see_the_book_configuration(project: Project) {
        project.write("cover.html", "<h1>{{Title}}</h1><p>{{Description}}</p>\n");
        let config = project.config(&["cover", "blurb"], Vec::new());

        let (document, report) = assemble(&config, &MemoryRecordSource::default());
        assert_eq!(report.static_sections, 1);
        assert!(document.contains("<h1>Brit Butt</h1><p>Twelve hours, one island</p>"));
        assert!(document.ends_with("</body>\n</html>\n"));
    }

    #[rstest]
    fn unknown_streams_are_skipped(project: Project) {
        project.write("cover.html", "<h1>{{Title}}</h1>\n");
        let config = project.config(&["stream.nowhere", "cover"], Vec::new());

        let (document, report) = assemble(&config, &MemoryRecordSource::default());
        assert!(report.streams.is_empty());
        assert!(report.failed_streams.is_empty());
        assert!(document.contains("<h1>Brit Butt</h1>"));
    }

    #[rstest]
    fn static_streams_render_their_template_once(project: Project) {
        project.write("rules.html", "<section>{{#each Streams}}{{StreamID}} {{/each}}</section>\n");
        let config = project.config(&["stream.rules"], vec![stream("rules", StreamKind::Static)]);

        let (document, report) = assemble(&config, &MemoryRecordSource::default());
        assert_eq!(report.static_sections, 1);
        assert!(document.contains("<section>rules </section>"));
        assert!(!document.contains("class=\"page\""));
    }

    #[rstest]
    fn project_stylesheet_is_embedded(project: Project) {
        project.write("rbook.css", ".bonus { width: 25%; }\n");
        let config = project.config(&[], Vec::new());

        let (document, _) = assemble(&config, &MemoryRecordSource::default());
        assert!(document.contains(".bonus { width: 25%; }\n</style>"));
    }

    #[rstest]
    fn combos_list_their_constituent_bonuses(project: Project) {
        project.write(
            "combos.html",
            "<p>{{ComboID}} {{ScorePoints}}:{{#each Bonuses}} {{BonusID}}={{BriefDesc}}{{/each}}</p>\n",
        );
        let config = project.config(&["stream.combos"], vec![stream("combos", StreamKind::Combo)]);
        let mut source = MemoryRecordSource::default();
        for (id, description) in [("B1", "Lighthouse"), ("B2", "Castle")] {
            source.push_bonus(rbook_core::BonusRow {
                id: id.to_owned(),
                description: description.to_owned(),
                ..rbook_core::BonusRow::default()
            });
        }
        source.push_combo(ComboRow {
            id: String::from("C1"),
            bonus_list: String::from("B1,B2"),
            score_points: String::from("50"),
            ..ComboRow::default()
        });
        source.push_combo(ComboRow {
            id: String::from("C2"),
            bonus_list: String::from("B1,B2"),
            score_points: String::from("10"),
            minimum_ticks: 3,
            ..ComboRow::default()
        });

        let (document, report) = assemble(&config, &source);
        let combos = report.streams.first().expect("combo stream rendered");
        assert_eq!(combos.rendered, 1);
        assert_eq!(combos.skipped, 1);
        assert!(document.contains("<p>C1 50: B1=Lighthouse B2=Castle</p>"));
        assert!(!document.contains("C2"));
    }

    #[rstest]
    fn entrants_render_with_derived_fields(project: Project) {
        project.write(
            "riders.html",
            "<p>{{EntrantID}} {{RiderName}}{{#if OdoKms}} km{{/if}}</p>\n",
        );
        let config = project.config(&["stream.riders"], vec![stream("riders", StreamKind::Entrant)]);
        let mut source = MemoryRecordSource::default();
        source.push_entrant(EntrantRow {
            id: 7,
            rider_name: String::from("Ann Rider"),
            odo_kms: 1,
            ..EntrantRow::default()
        });

        let (document, report) = assemble(&config, &source);
        assert_eq!(report.streams.first().map(|stream| stream.rendered), Some(1));
        assert!(document.contains("<p>7 Ann Rider km</p>"));
    }

    #[rstest]
    fn nopagetop_streams_open_a_plain_container(project: Project) {
        project.write("bonus.html", "<i>{{BonusID}}</i>");
        let mut bonuses = stream("main", StreamKind::Bonus);
        bonuses.template = String::from("bonus");
        bonuses.no_page_top = true;
        let config = project.config(&["stream.main"], vec![bonuses]);
        let source = MemoryRecordSource::with_bonuses([rbook_core::BonusRow {
            id: String::from("B1"),
            ..rbook_core::BonusRow::default()
        }]);

        let (document, _) = assemble(&config, &source);
        assert!(document.contains("<div class=\"nopage\">\n<i>B1</i></div>\n"));
    }

    #[rstest]
    fn malformed_templates_stop_the_run(project: Project) {
        project.write("cover.html", "{{#if Title}}never closed");
        let config = project.config(&["cover"], Vec::new());
        let result = DocumentAssembler::new(&config, &MemoryRecordSource::default(), Vec::new())
            .assemble();
        assert!(matches!(result, Err(AssembleError::Template(_))));
    }
}
