//! Material definitions and the active material set
//!
//! Recyclables come in pairs so they can be matched; contaminants are
//! singletons that only ever cost points.

/// A static material entry: one tile per definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialDef {
    pub name: &'static str,
    pub contaminant: bool,
}

impl MaterialDef {
    pub const fn recyclable(name: &'static str) -> Self {
        Self {
            name,
            contaminant: false,
        }
    }

    pub const fn contaminant(name: &'static str) -> Self {
        Self {
            name,
            contaminant: true,
        }
    }
}

/// Opening set: 4 recyclable pairs plus 2 contaminants
pub const BASE_MATERIALS: [MaterialDef; 10] = [
    MaterialDef::recyclable("Plastic Bottle"),
    MaterialDef::recyclable("Paper Bag"),
    MaterialDef::recyclable("Glass Jar"),
    MaterialDef::recyclable("Metal Can"),
    MaterialDef::recyclable("Plastic Bottle"),
    MaterialDef::recyclable("Paper Bag"),
    MaterialDef::recyclable("Glass Jar"),
    MaterialDef::recyclable("Metal Can"),
    MaterialDef::contaminant("Food Waste"),
    MaterialDef::contaminant("Styrofoam"),
];

/// Batch appended on every "play again"
pub const ESCALATION_MATERIALS: [MaterialDef; 5] = [
    MaterialDef::recyclable("Cardboard Box"),
    MaterialDef::recyclable("Newspaper"),
    MaterialDef::recyclable("Aluminum Foil"),
    MaterialDef::contaminant("Plastic Straw"),
    MaterialDef::contaminant("Plastic Bag"),
];

/// The materials dealt at round start. Only ever grows within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialSet {
    defs: Vec<MaterialDef>,
    escalations: u32,
}

impl Default for MaterialSet {
    fn default() -> Self {
        Self::base()
    }
}

impl MaterialSet {
    pub fn base() -> Self {
        Self::from_defs(BASE_MATERIALS.to_vec())
    }

    pub fn from_defs(defs: Vec<MaterialDef>) -> Self {
        Self {
            defs,
            escalations: 0,
        }
    }

    pub fn defs(&self) -> &[MaterialDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Number of times the escalation batch has been appended
    pub fn escalations(&self) -> u32 {
        self.escalations
    }

    pub fn recyclable_count(&self) -> usize {
        self.defs.iter().filter(|d| !d.contaminant).count()
    }

    pub fn contaminant_count(&self) -> usize {
        self.defs.len() - self.recyclable_count()
    }

    /// Matches needed to clear a round dealt from this set
    pub fn pairs_to_clear(&self) -> usize {
        self.recyclable_count() / 2
    }

    /// Append the escalation batch (cumulative)
    pub fn escalate(&mut self) {
        self.defs.extend_from_slice(&ESCALATION_MATERIALS);
        self.escalations += 1;
        log::info!(
            "Material set escalated (level {}): {} tiles, {} contaminants",
            self.escalations,
            self.defs.len(),
            self.contaminant_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_set_shape() {
        let set = MaterialSet::base();
        assert_eq!(set.len(), 10);
        assert_eq!(set.recyclable_count(), 8);
        assert_eq!(set.contaminant_count(), 2);
        assert_eq!(set.pairs_to_clear(), 4);

        // Every recyclable in the base set appears exactly twice
        for def in set.defs().iter().filter(|d| !d.contaminant) {
            let count = set.defs().iter().filter(|d| d.name == def.name).count();
            assert_eq!(count, 2, "{} should form a pair", def.name);
        }
    }

    #[test]
    fn test_escalation_is_cumulative() {
        let mut set = MaterialSet::base();
        set.escalate();
        assert_eq!(set.len(), 15);
        assert_eq!(set.recyclable_count(), 11);
        assert_eq!(set.pairs_to_clear(), 5);

        set.escalate();
        assert_eq!(set.len(), 20);
        assert_eq!(set.contaminant_count(), 6);
        assert_eq!(set.pairs_to_clear(), 7);
        assert_eq!(set.escalations(), 2);
    }
}
