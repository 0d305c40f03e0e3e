use crate::cache::CachedState;
use std::collections::BTreeSet;
use std::fmt;

/// A tracked release component.
///
/// Declaration order is the order in which changed components are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Snapshot,
    Stable,
    Launcher,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Snapshot, Component::Stable, Component::Launcher];

    pub fn label(self) -> &'static str {
        match self {
            Component::Snapshot => "snapshot",
            Component::Stable => "stable",
            Component::Launcher => "launcher",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Versions observed during the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedVersions {
    pub stable_version: String,
    pub snapshot_version: String,
    pub launcher_version: String,
}

impl FetchedVersions {
    fn get(&self, component: Component) -> &str {
        match component {
            Component::Snapshot => &self.snapshot_version,
            Component::Stable => &self.stable_version,
            Component::Launcher => &self.launcher_version,
        }
    }
}

impl From<FetchedVersions> for CachedState {
    fn from(value: FetchedVersions) -> Self {
        CachedState {
            version: value.stable_version,
            snapshot_version: value.snapshot_version,
            launcher_version: Some(value.launcher_version),
        }
    }
}

fn cached_version(state: &CachedState, component: Component) -> Option<&str> {
    match component {
        Component::Snapshot => Some(state.snapshot_version.as_str()),
        Component::Stable => Some(state.version.as_str()),
        Component::Launcher => state.launcher_version.as_deref(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    components: BTreeSet<Component>,
}

impl ChangeSet {
    /// Determine which components differ from the cached state.
    ///
    /// Without a cached state every component counts as changed.
    pub fn detect(cached: Option<&CachedState>, fetched: &FetchedVersions) -> Self {
        let components = Component::ALL
            .into_iter()
            .filter(|&component| match cached {
                None => true,
                Some(state) => cached_version(state, component) != Some(fetched.get(component)),
            })
            .collect();

        Self { components }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Component> + '_ {
        self.components.iter().copied()
    }

    /// Comma separated labels, in reporting order.
    pub fn download_input(&self) -> String {
        self.iter()
            .map(Component::label)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<Component> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
