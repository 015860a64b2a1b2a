use chrono::Utc;
use components::{controls::Controls, map_component::MapComponent};
use gloo_console::{error, info};
use location::{BrowserLocation, LocateResult};
use run_tracker_lib::{LocateKind, LocationError, RunTracker, Sample, SessionToken, TrackerConfig};
use ticker::IntervalTicker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use yew::prelude::*;

mod components;
mod location;
mod ticker;

enum MainMsg {
    Start,
    Stop,
    LocateMe,
    Sample(SessionToken, Sample),
    WatchFailed(SessionToken, LocationError),
    Tick(SessionToken),
    Located(LocateKind, Result<Sample, LocationError>),
}

struct Model {
    tracker: RunTracker<BrowserLocation, IntervalTicker>,
}

fn load_config() -> TrackerConfig {
    match TrackerConfig::parse(include_str!("../tracker.conf")) {
        Ok(config) => config,
        Err(e) => {
            error!(format!("Invalid tracker.conf, using defaults: {}", e));
            TrackerConfig::default()
        }
    }
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();

        let location = BrowserLocation::new(
            link.callback(|(token, sample): (SessionToken, Sample)| MainMsg::Sample(token, sample)),
            link.callback(|(token, error): (SessionToken, LocationError)| MainMsg::WatchFailed(token, error)),
            link.callback(|(kind, result): LocateResult| MainMsg::Located(kind, result)),
        );
        let ticker = IntervalTicker::new(link.callback(MainMsg::Tick));

        let mut tracker = RunTracker::new(load_config(), location, ticker);

        // Best effort, the locate button covers browsers that want a user gesture
        tracker.request_initial_position();

        Self { tracker }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::Start => {
                match self.tracker.start(Utc::now()) {
                    Ok(token) => info!(format!("Tracking session {}", token)),
                    Err(e) => error!(format!("Could not start tracking: {}", e)),
                }
                true
            }
            MainMsg::Stop => {
                self.tracker.stop();
                self.tracker.request_initial_position();
                true
            }
            MainMsg::LocateMe => {
                if let Err(e) = self.tracker.locate_me() {
                    error!(format!("Locate failed: {}", e));
                }
                true
            }
            MainMsg::Sample(token, sample) => self.tracker.on_sample(token, sample),
            MainMsg::WatchFailed(token, e) => {
                let applied = self.tracker.on_watch_error(token, e);
                if applied {
                    error!(format!("Tracking stopped: {}", e));
                }
                applied
            }
            MainMsg::Tick(token) => self.tracker.on_tick(token, Utc::now()),
            MainMsg::Located(kind, result) => {
                self.tracker.on_located(kind, result);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let view = self.tracker.view();
        let config = self.tracker.config();

        html! {
            <div class="app">
                <MapComponent
                    current_position={view.current_position.copied()}
                    route={view.route.to_vec()}
                    tile_url={config.tile_url.clone()}
                    zoom={config.default_zoom}
                    on_locate_me={link.callback(|()| MainMsg::LocateMe)}
                />
                <Controls
                    status={view.status}
                    stats={view.stats}
                    error_message={view.error_message.map(AttrValue::from)}
                    on_start={link.callback(|()| MainMsg::Start)}
                    on_stop={link.callback(|()| MainMsg::Stop)}
                />
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.tracker.teardown();
    }
}

fn main() {
    // Routes the tracker's session logs to the browser console
    let console = WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::DEBUG)
        .set_report_logs_in_timings(false)
        .build();
    tracing_subscriber::registry().with(WASMLayer::new(console)).init();

    yew::Renderer::<Model>::new().render();
}
