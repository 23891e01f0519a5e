use crate::schedule::ScheduleSource;

// -----------------------------------------------------------------------------
// CalendarSettings
// -----------------------------------------------------------------------------
/// User preferences of the calendar.
///
/// ```
/// use dccalendar::CalendarSettings;
///
/// let settings: CalendarSettings = serde_json::from_str(r#"{"search_depth": 5}"#).unwrap();
/// assert_eq!(settings.search_depth(), 5);
/// assert!(settings.schedules().is_empty());
///
/// assert!(serde_json::from_str::<CalendarSettings>(r#"{"search_depth": 0}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, schemars::JsonSchema)]
pub struct CalendarSettings {
    /// Days ahead scanned for holidays, the pivot included. At least 1.
    #[schemars(range(min = 1))]
    search_depth: u32,
    schedules: Vec<ScheduleSource>,
}

//
// ser/de
//
impl<'de> serde::Deserialize<'de> for CalendarSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Inner {
            #[serde(default = "CalendarSettings::default_search_depth")]
            search_depth: u32,
            #[serde(default)]
            schedules: Vec<ScheduleSource>,
        }
        let Inner {
            search_depth,
            schedules,
        } = Inner::deserialize(deserializer)?;
        Self::new(search_depth, schedules).map_err(serde::de::Error::custom)
    }
}

//
// ctor
//
impl CalendarSettings {
    pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

    #[inline]
    pub fn new(search_depth: u32, schedules: Vec<ScheduleSource>) -> anyhow::Result<Self> {
        anyhow::ensure!(search_depth >= 1, "search depth must be at least 1");
        Ok(Self {
            search_depth,
            schedules,
        })
    }

    #[inline]
    fn default_search_depth() -> u32 {
        Self::DEFAULT_SEARCH_DEPTH
    }
}

impl Default for CalendarSettings {
    #[inline]
    fn default() -> Self {
        Self {
            search_depth: Self::DEFAULT_SEARCH_DEPTH,
            schedules: Vec::new(),
        }
    }
}

//
// methods
//
impl CalendarSettings {
    #[inline]
    pub fn search_depth(&self) -> u32 {
        self.search_depth
    }

    #[inline]
    pub fn schedules(&self) -> &[ScheduleSource] {
        &self.schedules
    }

    /// Copy with the search depth replaced.
    #[inline]
    pub fn with_search_depth(self, search_depth: u32) -> anyhow::Result<Self> {
        Self::new(search_depth, self.schedules)
    }
}
