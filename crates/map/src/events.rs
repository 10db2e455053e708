/// Map lifecycle events, recorded per frame for traceability.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapEventKind {
    DatasetsLoaded,
    DatasetFailed,
    LevelChanged,
    SearchJump,
    RegionSelected,
    /// An animated zoom or reset settled at its target scale.
    ZoomCommitted,
}

impl MapEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MapEventKind::DatasetsLoaded => "datasets-loaded",
            MapEventKind::DatasetFailed => "dataset-failed",
            MapEventKind::LevelChanged => "level-changed",
            MapEventKind::SearchJump => "search-jump",
            MapEventKind::RegionSelected => "region-selected",
            MapEventKind::ZoomCommitted => "zoom-committed",
        }
    }
}

impl std::fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEvent {
    pub frame_index: u64,
    pub kind: MapEventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<MapEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame_index: u64, kind: MapEventKind, message: impl Into<String>) {
        self.events.push(MapEvent {
            frame_index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[MapEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }
}
