use crate::model::ids::{ComponentId, SystemId};

/// Prompts shown next to each note field while the learner writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hints {
    pub visual_description: &'static str,
    pub function: &'static str,
    pub operation: &'static str,
}

/// Reference definition of a single component. Read-only at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub visual_description: &'static str,
    pub function: &'static str,
    pub operation: &'static str,
    pub hints: Hints,
}

impl ComponentDefinition {
    #[must_use]
    pub fn component_id(&self) -> ComponentId {
        ComponentId::new(self.id)
    }
}

/// Static catalog of systems and their components.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    disc: &'static [ComponentDefinition],
    drum: &'static [ComponentDefinition],
}

impl Catalog {
    /// The City & Guilds 7290 brake catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            disc: DISC_COMPONENTS,
            drum: DRUM_COMPONENTS,
        }
    }

    /// Build a catalog from arbitrary definitions (used by tests and tooling).
    #[must_use]
    pub fn from_parts(
        disc: &'static [ComponentDefinition],
        drum: &'static [ComponentDefinition],
    ) -> Self {
        Self { disc, drum }
    }

    /// Components of a system, in display order.
    #[must_use]
    pub fn components(&self, system: SystemId) -> &'static [ComponentDefinition] {
        match system {
            SystemId::Disc => self.disc,
            SystemId::Drum => self.drum,
        }
    }

    /// Look up a component definition by id.
    #[must_use]
    pub fn definition(
        &self,
        system: SystemId,
        component: &ComponentId,
    ) -> Option<&'static ComponentDefinition> {
        self.components(system)
            .iter()
            .find(|def| def.id == component.as_str())
    }

    #[must_use]
    pub fn contains(&self, system: SystemId, component: &ComponentId) -> bool {
        self.definition(system, component).is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//
// ─── DISC BRAKES ───────────────────────────────────────────────────────────────
//

static DISC_COMPONENTS: &[ComponentDefinition] = &[
    ComponentDefinition {
        id: "brake-disc",
        name: "Brake Disc (Rotor)",
        visual_description: "Circular metal disc with ventilation vanes between two friction surfaces, typically 250-380mm diameter, with mounting holes in the center hub",
        function: "Provides friction surface for brake pads to clamp against, converting kinetic energy to heat",
        operation: "Rotates with the wheel. When brakes applied, pads clamp both faces creating friction. Ventilation vanes dissipate heat",
        hints: Hints {
            visual_description: "Describe what you see: shape, color, size, any holes or vents",
            function: "What does this component do? What is its job?",
            operation: "How does it work? What happens when brakes are applied?",
        },
    },
    ComponentDefinition {
        id: "brake-caliper",
        name: "Brake Caliper",
        visual_description: "Red or metallic housing that straddles the disc edge, rectangular shape with pistons visible, bleeder valve on top",
        function: "Houses pistons and brake pads; converts hydraulic pressure into mechanical clamping force",
        operation: "Straddles disc at top. Hydraulic pressure pushes pistons outward, forcing pads against disc faces",
        hints: Hints {
            visual_description: "What color is it? Where is it positioned? What shape?",
            function: "What does the caliper contain? What does it convert?",
            operation: "Where is it mounted? What moves when brakes are applied?",
        },
    },
    ComponentDefinition {
        id: "brake-pads",
        name: "Brake Pads",
        visual_description: "Flat rectangular blocks with golden/brown friction material bonded to steel backing plate, about 10mm thick when new",
        function: "Create friction against disc faces to slow the vehicle through contact and heat generation",
        operation: "Positioned either side of disc. Pistons push pads against rotating disc creating friction and heat",
        hints: Hints {
            visual_description: "What color is the friction material? How thick? What is the backing made of?",
            function: "What do pads create? Against what surface?",
            operation: "Where are they positioned? What pushes them?",
        },
    },
    ComponentDefinition {
        id: "caliper-pistons",
        name: "Caliper Pistons",
        visual_description: "Cylindrical metal pistons (silver or blue), 30-60mm diameter, with rubber dust boots at the base",
        function: "Push brake pads against disc faces using hydraulic pressure from the brake fluid",
        operation: "Sit behind pads inside caliper. Hydraulic pressure forces them outward, moving pads toward disc",
        hints: Hints {
            visual_description: "What shape? What material? What protects them?",
            function: "What do pistons push? What type of pressure moves them?",
            operation: "Where are they located? Which direction do they move?",
        },
    },
    ComponentDefinition {
        id: "wheel-hub",
        name: "Wheel Hub Assembly",
        visual_description: "Central circular mounting with 4-6 wheel studs protruding, gray metal, contains bearing assembly in center",
        function: "Mounting point for brake disc and wheel; contains bearings that allow rotation",
        operation: "Disc bolts to hub flange. Hub rotates on bearings. Wheel mounts over disc with lug nuts",
        hints: Hints {
            visual_description: "How many studs? What color? What is in the center?",
            function: "What mounts to it? What does it contain?",
            operation: "What connects to the hub? How does it rotate?",
        },
    },
    ComponentDefinition {
        id: "brake-fluid",
        name: "Brake Fluid",
        visual_description: "Clear to amber hydraulic fluid in translucent reservoir, glycol-based with specific DOT rating visible on cap",
        function: "Transmits hydraulic pressure from master cylinder to calipers throughout the brake system",
        operation: "Master cylinder pressurizes fluid when pedal pressed. Incompressible fluid instantly transfers force to all calipers",
        hints: Hints {
            visual_description: "What color? Where is it stored? What is on the cap?",
            function: "What does it transmit? From where to where?",
            operation: "What pressurizes it? What property allows force transfer?",
        },
    },
];

//
// ─── DRUM BRAKES ───────────────────────────────────────────────────────────────
//

static DRUM_COMPONENTS: &[ComponentDefinition] = &[
    ComponentDefinition {
        id: "brake-drum",
        name: "Brake Drum",
        visual_description: "Cylindrical metal housing, 200-300mm diameter, open at back, smooth inner friction surface",
        function: "Provides friction surface and houses brake shoes; rotates with the wheel",
        operation: "Rotates with wheel. Shoes press outward against inner surface when hydraulic pressure applied",
        hints: Hints {
            visual_description: "What shape? How big? Where is it open?",
            function: "What does it contain? What does it provide?",
            operation: "What rotates with it? What presses against it?",
        },
    },
    ComponentDefinition {
        id: "brake-shoes",
        name: "Brake Shoes",
        visual_description: "Semi-circular curved metal with brown/black friction lining on outer edge, leading and trailing shoe arrangement",
        function: "Press against drum inner surface to create friction and slow the vehicle",
        operation: "Wheel cylinder pushes shoes outward against drum. Leading shoe self-servo action provides most force",
        hints: Hints {
            visual_description: "What shape? What covers the surface? How many?",
            function: "What do they press against? What do they create?",
            operation: "What pushes them? Which shoe does more work?",
        },
    },
    ComponentDefinition {
        id: "wheel-cylinder",
        name: "Wheel Cylinder",
        visual_description: "Small cylindrical housing at top of backing plate, two pistons visible at ends, bleeder valve on top",
        function: "Converts hydraulic pressure to mechanical force that pushes brake shoes outward",
        operation: "Located at top between shoes. Hydraulic pressure forces two pistons outward simultaneously",
        hints: Hints {
            visual_description: "Where is it positioned? What is visible? What is on top?",
            function: "What type of pressure? What does it push?",
            operation: "Where is it located? How many pistons? Which direction?",
        },
    },
    ComponentDefinition {
        id: "return-springs",
        name: "Return Springs",
        visual_description: "Heavy coil springs connecting top and bottom of brake shoes, typically silver or colored metal",
        function: "Pull brake shoes away from drum when hydraulic pressure is released",
        operation: "Strong tension pulls shoes inward when pedal released, preventing brake drag",
        hints: Hints {
            visual_description: "What connects them? What material? Where positioned?",
            function: "What do they pull? When do they activate?",
            operation: "Which direction do they pull? What do they prevent?",
        },
    },
    ComponentDefinition {
        id: "adjuster",
        name: "Adjuster Mechanism",
        visual_description: "Threaded rod or star wheel at bottom between shoes, can be rotated with brake spoon tool",
        function: "Maintains correct clearance between shoes and drum as linings wear",
        operation: "Extends as linings wear thin. Automatic types ratchet during reverse braking. Manual types need periodic adjustment",
        hints: Hints {
            visual_description: "Where is it located? What shape? What tool adjusts it?",
            function: "What does it maintain? What wears?",
            operation: "When does it extend? What are the two types?",
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_sizes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.components(SystemId::Disc).len(), 6);
        assert_eq!(catalog.components(SystemId::Drum).len(), 5);
    }

    #[test]
    fn ids_are_unique_within_each_system() {
        let catalog = Catalog::builtin();
        for system in SystemId::ALL {
            let ids: HashSet<_> = catalog.components(system).iter().map(|d| d.id).collect();
            assert_eq!(ids.len(), catalog.components(system).len());
        }
    }

    #[test]
    fn reference_text_is_never_empty() {
        let catalog = Catalog::builtin();
        for system in SystemId::ALL {
            for def in catalog.components(system) {
                assert!(!def.visual_description.is_empty(), "{}", def.id);
                assert!(!def.function.is_empty(), "{}", def.id);
                assert!(!def.operation.is_empty(), "{}", def.id);
            }
        }
    }

    #[test]
    fn definition_lookup_is_scoped_to_system() {
        let catalog = Catalog::builtin();
        let disc = ComponentId::new("brake-disc");
        assert_eq!(
            catalog.definition(SystemId::Disc, &disc).map(|d| d.name),
            Some("Brake Disc (Rotor)")
        );
        assert!(catalog.definition(SystemId::Drum, &disc).is_none());
    }
}
