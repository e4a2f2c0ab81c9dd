use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Local;
use inventory_core::{update, AppState, AppViewModel, Msg};
use inventory_engine::ReqwestInventoryApi;
use inventory_logging::{log_debug, log_info};

use super::effects::EffectRunner;
use super::input::{parse_line, Command};
use super::ui;
use super::ui::constants::{HELP_TEXT, PROMPT};
use crate::config::AppConfig;

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    Engine(Msg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(config: &AppConfig) -> anyhow::Result<()> {
    let api = ReqwestInventoryApi::new(config.client_settings())
        .with_context(|| format!("invalid backend url {:?}", config.base_url))?;
    log_info!("backend at {}", api.base_url());

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner =
        EffectRunner::new(Arc::new(api), event_tx.clone()).context("cannot start engine")?;
    spawn_input_reader(event_tx).context("cannot read standard input")?;

    let stdout = io::stdout();
    let mut app = App::new(runner, stdout.lock());
    app.start()?;
    app.run(&event_rx)?;
    log_info!("bye");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(AppEvent::Input(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}

/// Owns the controller state; only the main loop touches it.
struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> App<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        writeln!(self.out, "Tapez « help » pour la liste des commandes.")?;
        self.dispatch_msgs(vec![Msg::Started])
    }

    fn run(&mut self, events: &mpsc::Receiver<AppEvent>) -> io::Result<()> {
        while let Ok(event) = events.recv() {
            if self.handle_event(event)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> io::Result<Flow> {
        match event {
            AppEvent::Engine(msg) => self.dispatch_msgs(vec![msg])?,
            AppEvent::InputClosed => return Ok(Flow::Quit),
            AppEvent::Input(line) => {
                match parse_line(&line, self.state.pending_delete().is_some()) {
                    Command::Msgs(msgs) => self.dispatch_msgs(msgs)?,
                    Command::Help => {
                        writeln!(self.out, "{HELP_TEXT}")?;
                        self.prompt()?;
                    }
                    Command::Quit => return Ok(Flow::Quit),
                    Command::Empty => self.prompt()?,
                    Command::Invalid(message) => {
                        writeln!(self.out, "{message}")?;
                        self.prompt()?;
                    }
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Applies the messages in order and renders once if anything changed.
    fn dispatch_msgs(&mut self, msgs: Vec<Msg>) -> io::Result<()> {
        let mut was_dirty = false;
        for msg in msgs {
            log_debug!("msg {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            was_dirty |= state.consume_dirty();
            self.state = state;
            self.runner.run(effects);
        }

        if was_dirty {
            let view = self.state.view();
            self.render(&view)?;
        }
        Ok(())
    }

    fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        writeln!(self.out)?;
        for line in ui::render::render(view, Local::now().time()) {
            writeln!(self.out, "{line}")?;
        }
        self.prompt()
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use inventory_core::{TableBody, TableState};
    use inventory_engine::ClientSettings;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn start_app(server: &MockServer) -> (App<Vec<u8>>, mpsc::Receiver<AppEvent>) {
        let api = ReqwestInventoryApi::new(ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        })
        .unwrap();
        let (tx, rx) = mpsc::channel();
        let runner = EffectRunner::new(Arc::new(api), tx).unwrap();
        let mut app = App::new(runner, Vec::new());
        app.start().unwrap();
        (app, rx)
    }

    /// Feeds `count` engine completions into the app.
    fn pump(app: &mut App<Vec<u8>>, rx: &mpsc::Receiver<AppEvent>, count: usize) {
        for _ in 0..count {
            let event = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("engine event");
            assert_eq!(app.handle_event(event).unwrap(), Flow::Continue);
        }
    }

    fn type_line(app: &mut App<Vec<u8>>, line: &str) {
        assert_eq!(
            app.handle_event(AppEvent::Input(line.to_string())).unwrap(),
            Flow::Continue
        );
    }

    fn row_ids(app: &App<Vec<u8>>) -> Vec<i64> {
        match app.state.view().table {
            TableBody::Rows(rows) => rows.iter().map(|row| row.id).collect(),
            _ => Vec::new(),
        }
    }

    async fn mount_startup(server: &MockServer, products: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "nom": "Informatique"}])),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/produits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(server)
            .await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_during_search_re_queries_the_filter() {
        let server = MockServer::start().await;
        mount_startup(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path("/recherche"))
            .and(query_param("nom", "bolt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nom": "bolt M4", "quantite": 10},
                {"id": 2, "nom": "bolt M6", "quantite": 8}
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/recherche"))
            .and(query_param("nom", "bolt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nom": "bolt M4", "quantite": 10}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/produits/2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Produit supprimé"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, rx) = start_app(&server);
        pump(&mut app, &rx, 2);
        assert!(!app.state.is_loading());

        type_line(&mut app, "search bolt");
        pump(&mut app, &rx, 1);
        assert_eq!(row_ids(&app), vec![1, 2]);

        type_line(&mut app, "delete 2");
        assert_eq!(app.state.pending_delete(), Some(2));
        type_line(&mut app, "o");
        pump(&mut app, &rx, 2);
        assert_eq!(row_ids(&app), vec![1]);

        let requests = server.received_requests().await.unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.url.path(), "/recherche");
        assert_eq!(last.url.query(), Some("nom=bolt"));

        let output = String::from_utf8(app.out).unwrap();
        assert!(output.contains("Filtre actif : \"bolt\""));
        assert!(output.contains("supprimer le produit #2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancelled_delete_sends_nothing() {
        let server = MockServer::start().await;
        mount_startup(&server, json!([{"id": 2, "nom": "Vis", "quantite": 3}])).await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut app, rx) = start_app(&server);
        pump(&mut app, &rx, 2);

        type_line(&mut app, "delete 2");
        type_line(&mut app, "n");
        assert_eq!(app.state.pending_delete(), None);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_delta_shows_server_message_and_keeps_input() {
        let server = MockServer::start().await;
        mount_startup(&server, json!([{"id": 3, "nom": "Vis", "quantite": 3}])).await;
        Mock::given(method("PUT"))
            .and(path("/produits/3"))
            .and(body_json(json!({"delta": -5})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "stock insuffisant"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, rx) = start_app(&server);
        pump(&mut app, &rx, 2);

        type_line(&mut app, "delta 3 -5");
        pump(&mut app, &rx, 1);

        assert_eq!(app.state.alert(), Some("stock insuffisant"));
        assert_eq!(app.state.delta_input(3), Some("-5"));
        let output = String::from_utf8(app.out).unwrap();
        assert!(output.contains("ALERTE : stock insuffisant"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn zero_delta_issues_no_request() {
        let server = MockServer::start().await;
        mount_startup(&server, json!([{"id": 3, "nom": "Vis", "quantite": 3}])).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut app, rx) = start_app(&server);
        pump(&mut app, &rx, 2);

        type_line(&mut app, "delta 3 0");
        type_line(&mut app, "delta 3 beaucoup");
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn added_product_appears_after_unfiltered_reload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/produits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/produits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nom": "Widget", "quantite": 10}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/produits"))
            .and(body_json(json!({"nom": "Widget", "quantite": 10})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Produit ajouté"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, rx) = start_app(&server);
        pump(&mut app, &rx, 2);
        assert_eq!(app.state.table(), &TableState::Rows(Vec::new()));

        type_line(&mut app, "add 10 Widget");
        pump(&mut app, &rx, 2);

        assert_eq!(app.state.form().nom, "");
        assert_eq!(app.state.form().quantite, "");
        assert_eq!(row_ids(&app), vec![1]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn quit_and_closed_input_stop_the_loop() {
        let server = MockServer::start().await;
        mount_startup(&server, json!([])).await;
        let (mut app, _rx) = start_app(&server);

        assert_eq!(
            app.handle_event(AppEvent::Input("quit".to_string())).unwrap(),
            Flow::Quit
        );
        assert_eq!(app.handle_event(AppEvent::InputClosed).unwrap(), Flow::Quit);
    }
}
