//! Identities of the framework symbols the engine recognises.
//!
//! Built once per process and never mutated, so analyses running on
//! different threads read it without synchronisation.

use once_cell::sync::Lazy;
use smol_str::SmolStr;

use crate::model::Family;

/// Names belonging to one notification family.
#[derive(Debug)]
pub struct FamilySymbols {
    /// Fully qualified interface name.
    pub interface: SmolStr,
    /// Event declared by the interface.
    pub event: SmolStr,
    /// Recognised raise-method names, highest priority first.
    pub raise_methods: Vec<SmolStr>,
}

#[derive(Debug)]
pub struct WellKnown {
    pub changed: FamilySymbols,
    pub changing: FamilySymbols,
    /// Hook called with every changed property name.
    pub on_any_property_changed: SmolStr,
    bool_types: [&'static str; 2],
}

impl WellKnown {
    pub fn family(&self, family: Family) -> &FamilySymbols {
        match family {
            Family::Changed => &self.changed,
            Family::Changing => &self.changing,
        }
    }

    pub fn is_bool(&self, ty: &str) -> bool {
        self.bool_types.contains(&ty)
    }
}

static WELL_KNOWN: Lazy<WellKnown> = Lazy::new(|| WellKnown {
    changed: FamilySymbols {
        interface: SmolStr::new_static("System.ComponentModel.INotifyPropertyChanged"),
        event: SmolStr::new_static("PropertyChanged"),
        raise_methods: vec![
            SmolStr::new_static("OnPropertyChanged"),
            SmolStr::new_static("RaisePropertyChanged"),
            SmolStr::new_static("NotifyOfPropertyChange"),
            SmolStr::new_static("NotifyPropertyChanged"),
        ],
    },
    changing: FamilySymbols {
        interface: SmolStr::new_static("System.ComponentModel.INotifyPropertyChanging"),
        event: SmolStr::new_static("PropertyChanging"),
        raise_methods: vec![
            SmolStr::new_static("OnPropertyChanging"),
            SmolStr::new_static("RaisePropertyChanging"),
            SmolStr::new_static("NotifyOfPropertyChanging"),
            SmolStr::new_static("NotifyPropertyChanging"),
        ],
    },
    on_any_property_changed: SmolStr::new_static("OnAnyPropertyChanged"),
    bool_types: ["bool", "System.Boolean"],
});

/// The process-wide symbol table.
pub fn well_known() -> &'static WellKnown {
    &WELL_KNOWN
}

/// The name a raise method of `family` would get under the same convention
/// as `sibling`, a raise method of the other family.
///
/// `NotifyOfPropertyChanging` becomes `NotifyOfPropertyChanged`.
pub fn sibling_raise_name(sibling: &str, family: Family) -> Option<SmolStr> {
    let (from, to) = match family {
        Family::Changed => ("Changing", "Changed"),
        Family::Changing => ("Changed", "Changing"),
    };
    let stem = sibling.strip_suffix(from)?;
    if stem.is_empty() {
        return None;
    }
    Some(SmolStr::from(format!("{stem}{to}")))
}
