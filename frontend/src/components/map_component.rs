use gloo_console::info;
use gloo_utils::document;
use leaflet::{CircleMarker, CircleOptions, LatLng, Map, MapOptions, Polyline, PolylineOptions, TileLayer, TileLayerOptions};
use run_tracker_lib::Sample;
use wasm_bindgen::JsCast;
use web_sys::{js_sys::Array, HtmlElement, Node};
use yew::prelude::*;

pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    route_line: Polyline,
    drawn_points: usize,
    start_marker: Option<CircleMarker>,
    position_marker: Option<CircleMarker>,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub current_position: Option<Sample>,
    pub route: Vec<Sample>,
    pub tile_url: AttrValue,
    pub zoom: f64,
    pub on_locate_me: Callback<()>,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    fn sync_route(&mut self, route: &[Sample]) {
        // Shorter route than drawn means a new session started
        if route.len() < self.drawn_points {
            self.route_line.remove();
            self.route_line = make_polyline();
            self.route_line.add_to(&self.map);
            self.drawn_points = 0;

            if let Some(marker) = self.start_marker.take() {
                marker.remove();
            }
        }

        for sample in &route[self.drawn_points..] {
            self.route_line.add_lat_lng(&to_lat_lng(sample));
        }
        self.drawn_points = route.len();

        if let (None, Some(first)) = (&self.start_marker, route.first()) {
            let marker = CircleMarker::new_with_options(&to_lat_lng(first), &marker_options("#10b981", 6.));
            marker.add_to(&self.map);
            self.start_marker = Some(marker);
        }
    }

    fn sync_position(&mut self, position: Option<&Sample>) {
        match (position, &self.position_marker) {
            (Some(sample), Some(marker)) => {
                marker.set_lat_lng(&to_lat_lng(sample));
            }
            (Some(sample), None) => {
                let marker = CircleMarker::new_with_options(&to_lat_lng(sample), &marker_options("#2563eb", 8.));
                marker.add_to(&self.map);
                self.position_marker = Some(marker);
            }
            (None, _) => {
                if let Some(marker) = self.position_marker.take() {
                    marker.remove();
                }
            }
        }
    }
}

impl Component for MapComponent {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        let container: HtmlElement = document()
            .create_element("div")
            .ok()
            .and_then(|element| element.dyn_into().ok())
            .expect("document can create a div");
        container.set_class_name("map");

        let map = Map::new_with_element(&container, &MapOptions::default());
        let route_line = make_polyline();
        route_line.add_to(&map);

        Self {
            map,
            container,
            route_line,
            drawn_points: 0,
            start_marker: None,
            position_marker: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let props = ctx.props();
            self.map.set_max_zoom(19.);
            let center = props.current_position.as_ref().map(to_lat_lng).unwrap_or_else(|| LatLng::new(0., 0.));
            self.map.set_view(&center, props.zoom);
            add_tile_layer(&self.map, &props.tile_url);
            self.sync_route(&props.route);
            self.sync_position(props.current_position.as_ref());
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        self.map.invalidate_size(false);
        let props = ctx.props();

        self.sync_route(&props.route);
        self.sync_position(props.current_position.as_ref());

        if let Some(position) = recenter_target(old_props.current_position.as_ref(), props.current_position.as_ref()) {
            let zoom = self.map.get_zoom();
            self.map.set_view(&to_lat_lng(position), zoom);
        }

        if props.route.len() != old_props.route.len() {
            info!(format!("Route has {} points", props.route.len()));
        }

        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let on_locate_me = props.on_locate_me.clone();
        let onclick = Callback::from(move |_| on_locate_me.emit(()));

        html! {
            <div class="map">
                {self.render_map()}
                if props.current_position.is_none() && props.route.is_empty() {
                    <div class="map-waiting">
                        <p>{"Waiting for GPS signal..."}</p>
                    </div>
                }
                <button class="locate-btn" title="Locate me" {onclick}>{"◎"}</button>
            </div>
        }
    }
}

/// The view follows every new position, whether it came from the watch or a locate request.
fn recenter_target<'a>(shown: Option<&Sample>, current: Option<&'a Sample>) -> Option<&'a Sample> {
    current.filter(|position| shown != Some(*position))
}

fn to_lat_lng(sample: &Sample) -> LatLng {
    LatLng::new(sample.latitude, sample.longitude)
}

fn make_polyline() -> Polyline {
    let opts = PolylineOptions::new();
    opts.set_color("#0ea5e9".into());
    opts.set_weight(6.);
    opts.set_opacity(0.8);
    opts.set_smooth_factor(1.5);

    Polyline::new_with_options(&Array::new(), &opts)
}

fn marker_options(color: &str, radius: f64) -> CircleOptions {
    let opts = CircleOptions::new();
    opts.set_radius(radius);
    opts.set_color("white".into());
    opts.set_weight(2.);
    opts.set_fill_color(color.into());
    opts.set_fill_opacity(1.);
    opts
}

fn add_tile_layer(map: &Map, url: &str) {
    let opts = TileLayerOptions::new();
    opts.set_update_when_idle(true);
    TileLayer::new_options(url, &opts).add_to(map);
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn at(lat: f64, lng: f64) -> Sample {
        Sample::new(lat, lng, DateTime::from_timestamp_millis(1_700_000_000_000).unwrap())
    }

    #[test]
    fn recenters_on_first_fix() {
        let fix = at(56.15, 10.2);
        assert_eq!(recenter_target(None, Some(&fix)), Some(&fix));
    }

    #[test]
    fn recenters_when_located_away_from_shown_position() {
        // Initial fix shown, then the user walks off and asks to be located while idle
        let initial = at(56.15, 10.2);
        let located = at(56.16, 10.21);
        assert_eq!(recenter_target(Some(&initial), Some(&located)), Some(&located));
    }

    #[test]
    fn keeps_view_when_position_unchanged_or_gone() {
        let fix = at(56.15, 10.2);
        assert_eq!(recenter_target(Some(&fix), Some(&fix)), None);
        assert_eq!(recenter_target(Some(&fix), None), None);
        assert_eq!(recenter_target(None, None), None);
    }
}
