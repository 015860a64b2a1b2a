use run_tracker_lib::{
    stats::{format_distance, format_duration, format_pace},
    RunStats, SessionStatus,
};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct ControlsProps {
    pub status: SessionStatus,
    pub stats: RunStats,
    pub error_message: Option<AttrValue>,
    pub on_start: Callback<()>,
    pub on_stop: Callback<()>,
}

#[function_component]
pub fn Controls(props: &ControlsProps) -> Html {
    let stats = props.stats;

    let on_start = props.on_start.clone();
    let start = Callback::from(move |_| on_start.emit(()));
    let on_stop = props.on_stop.clone();
    let stop = Callback::from(move |_| on_stop.emit(()));

    html! { <>
        <div class="stats-bar component-container">
            <div class="stat">
                <p class="stat-label">{"Distance"}</p>
                <p class="stat-value">{format_distance(stats.distance_m)}</p>
            </div>
            <div class="stat">
                <p class="stat-label">{"Time"}</p>
                <p class="stat-value">{format_duration(stats.elapsed_s)}</p>
            </div>
            <div class="stat">
                <p class="stat-label">{"Pace"}</p>
                <p class="stat-value">{format_pace(stats.current_speed_mps)}</p>
            </div>
        </div>

        if let Some(message) = &props.error_message {
            <div class="error-toast">
                <span>{message.clone()}</span>
            </div>
        }

        <div class="action">
            if props.status == SessionStatus::Tracking {
                <button onclick={stop} class="stop-btn">{"■ Stop Tracking"}</button>
            } else {
                <button onclick={start} class="start-btn">{"▶ Start Run"}</button>
            }
        </div>
    </> }
}
