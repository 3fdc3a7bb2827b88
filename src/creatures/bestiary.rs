//! Built-in species.

use super::{
    AnimationDescriptor, AnimationEffect, AttackDefinition, EvolutionRule, SpeciesDefinition,
    Stats,
};

/// Species a new player can pick as their first companion.
pub const STARTERS: [&str; 3] = ["sproutle", "flaruba", "tidebble"];

const fn fx(
    effect: AnimationEffect,
    color: &'static str,
    secondary: &'static str,
    duration: f32,
) -> AnimationDescriptor {
    AnimationDescriptor {
        effect,
        color,
        secondary,
        duration,
    }
}

const fn attack(
    id: &'static str,
    name: &'static str,
    damage: u32,
    success_rate: f64,
    description: &'static str,
    animation: AnimationDescriptor,
) -> AttackDefinition {
    AttackDefinition {
        id,
        name,
        damage,
        success_rate,
        description,
        animation,
    }
}

pub fn all() -> Vec<SpeciesDefinition> {
    use AnimationEffect::{
        Beam, Burst, Dash, Meteor, Pulse, Quake, Ring, Slash, Spark, Thorn, Wave, Wind,
    };

    vec![
        // -- starters --------------------------------------------------------
        SpeciesDefinition {
            id: "sproutle",
            name: "Sproutle",
            description: "A curious seedling that loves to explore.",
            color: "#4ade80",
            base_stats: Stats::new(1, 6, 4, 5, 5),
            attacks: vec![
                attack(
                    "leaf-whip",
                    "Leaf Whip",
                    4,
                    0.95,
                    "A flurry of quick leaves.",
                    fx(Slash, "#4ade80", "#bbf7d0", 0.45),
                ),
                attack(
                    "root-snare",
                    "Root Snare",
                    6,
                    0.75,
                    "Binds the foe in roots.",
                    fx(Thorn, "#16a34a", "#4ade80", 0.55),
                ),
                attack(
                    "solar-sprout",
                    "Solar Sprout",
                    8,
                    0.55,
                    "Channels sunlight into a burst.",
                    fx(Burst, "#facc15", "#fde68a", 0.6),
                ),
            ],
            evolutions: vec![
                EvolutionRule {
                    target: "bloomtail",
                    requirement: |s| s.power >= 12,
                    description: "Becomes Bloomtail when power dominates.",
                },
                EvolutionRule {
                    target: "glimmeroot",
                    requirement: |s| s.speed >= 12,
                    description: "A nimble form for fast explorers.",
                },
            ],
        },
        SpeciesDefinition {
            id: "flaruba",
            name: "Flaruba",
            description: "A glowing fox with a loyal heart.",
            color: "#f97316",
            base_stats: Stats::new(1, 7, 5, 4, 4),
            attacks: vec![
                attack(
                    "ember-dash",
                    "Ember Dash",
                    5,
                    0.9,
                    "A charge wrapped in embers.",
                    fx(Dash, "#fb923c", "#f97316", 0.45),
                ),
                attack(
                    "flame-ring",
                    "Flame Ring",
                    7,
                    0.7,
                    "Throws a ring of fire around the foe.",
                    fx(Ring, "#f97316", "#fb7185", 0.55),
                ),
                attack(
                    "cinder-lance",
                    "Cinder Lance",
                    9,
                    0.5,
                    "Focuses heat into a searing jet.",
                    fx(Beam, "#f97316", "#fde68a", 0.55),
                ),
            ],
            evolutions: vec![
                EvolutionRule {
                    target: "pyrolynx",
                    requirement: |s| s.morale >= 12,
                    description: "Pyrolynx emerges when courage peaks.",
                },
                EvolutionRule {
                    target: "obsidrax",
                    requirement: |s| s.defense >= 12,
                    description: "The shell hardens into Obsidrax.",
                },
            ],
        },
        SpeciesDefinition {
            id: "tidebble",
            name: "Tidebble",
            description: "A sea bubble with a changeable temper.",
            color: "#60a5fa",
            base_stats: Stats::new(1, 5, 6, 5, 4),
            attacks: vec![
                attack(
                    "bubble-pop",
                    "Bubble Pop",
                    4,
                    0.95,
                    "Pelts the foe with popping bubbles.",
                    fx(Pulse, "#60a5fa", "#c4f1ff", 0.5),
                ),
                attack(
                    "tidal-wave",
                    "Rising Tide",
                    6,
                    0.75,
                    "A swell that swamps the foe.",
                    fx(Wave, "#38bdf8", "#22d3ee", 0.6),
                ),
                attack(
                    "abyss-pulse",
                    "Abyss Pulse",
                    9,
                    0.5,
                    "A shock of condensed water.",
                    fx(Beam, "#1d4ed8", "#60a5fa", 0.6),
                ),
            ],
            evolutions: vec![
                EvolutionRule {
                    target: "mistgale",
                    requirement: |s| s.speed >= 11 && s.morale >= 10,
                    description: "Mistgale forms when the spirit is light.",
                },
                EvolutionRule {
                    target: "abyssaur",
                    requirement: |s| s.power >= 11 && s.defense >= 10,
                    description: "With enough strength Tidebble becomes Abyssaur.",
                },
            ],
        },
        // -- evolved forms ---------------------------------------------------
        SpeciesDefinition {
            id: "bloomtail",
            name: "Bloomtail",
            description: "An agile leaf dragon dancing on the wind.",
            color: "#22c55e",
            base_stats: Stats::new(5, 13, 9, 12, 8),
            attacks: vec![
                attack(
                    "verdant-surge",
                    "Verdant Surge",
                    8,
                    0.9,
                    "A blade of green energy.",
                    fx(Slash, "#22c55e", "#bef264", 0.5),
                ),
                attack(
                    "petal-tempest",
                    "Petal Tempest",
                    11,
                    0.65,
                    "A stinging cyclone of petals.",
                    fx(Wind, "#f472b6", "#22c55e", 0.65),
                ),
                attack(
                    "wyrm-root",
                    "Wyrm Root",
                    14,
                    0.45,
                    "Strikes with razor roots.",
                    fx(Thorn, "#166534", "#22c55e", 0.6),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "glimmeroot",
            name: "Glimmeroot",
            description: "A woodland creature that melts into the light.",
            color: "#a3e635",
            base_stats: Stats::new(5, 11, 8, 14, 7),
            attacks: vec![
                attack(
                    "dawn-blades",
                    "Dawn Blades",
                    7,
                    0.92,
                    "Precise streaks of light.",
                    fx(Slash, "#bef264", "#fef08a", 0.45),
                ),
                attack(
                    "glint-field",
                    "Glint Field",
                    10,
                    0.7,
                    "Refracts light to surprise the foe.",
                    fx(Burst, "#fde68a", "#bef264", 0.55),
                ),
                attack(
                    "meteor-bloom",
                    "Meteor Bloom",
                    13,
                    0.5,
                    "A volley of exploding seeds.",
                    fx(Meteor, "#facc15", "#fb7185", 0.7),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "pyrolynx",
            name: "Pyrolynx",
            description: "A blazing cat with a piercing gaze.",
            color: "#fb7185",
            base_stats: Stats::new(5, 15, 10, 11, 13),
            attacks: vec![
                attack(
                    "flare-pounce",
                    "Flare Pounce",
                    9,
                    0.85,
                    "Leaps behind a veil of flame.",
                    fx(Dash, "#fb7185", "#fbbf24", 0.45),
                ),
                attack(
                    "pyre-comet",
                    "Pyre Comet",
                    12,
                    0.65,
                    "An incandescent comet.",
                    fx(Meteor, "#fb7185", "#f87171", 0.65),
                ),
                attack(
                    "sunspear",
                    "Sunspear",
                    16,
                    0.45,
                    "A focused ray of sunlight.",
                    fx(Beam, "#fde68a", "#f87171", 0.6),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "obsidrax",
            name: "Obsidrax",
            description: "A beast of volcanic rock, nearly impregnable.",
            color: "#64748b",
            base_stats: Stats::new(5, 12, 15, 8, 9),
            attacks: vec![
                attack(
                    "magma-crash",
                    "Magma Crash",
                    10,
                    0.85,
                    "A lava-charged blow.",
                    fx(Burst, "#f97316", "#facc15", 0.6),
                ),
                attack(
                    "obsidian-wall",
                    "Obsidian Shards",
                    12,
                    0.6,
                    "Hurls cutting splinters.",
                    fx(Spark, "#94a3b8", "#f97316", 0.6),
                ),
                attack(
                    "seismic-roar",
                    "Seismic Roar",
                    17,
                    0.45,
                    "Shakes the ground with a shockwave.",
                    fx(Quake, "#64748b", "#f97316", 0.7),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "mistgale",
            name: "Mistgale",
            description: "A water spirit light as air.",
            color: "#5eead4",
            base_stats: Stats::new(5, 10, 9, 15, 12),
            attacks: vec![
                attack(
                    "mist-knives",
                    "Mist Knives",
                    8,
                    0.9,
                    "Stealthy blades of water.",
                    fx(Slash, "#5eead4", "#99f6e4", 0.45),
                ),
                attack(
                    "cyclone-step",
                    "Cyclone Step",
                    11,
                    0.65,
                    "A sweeping whirlwind.",
                    fx(Wind, "#2dd4bf", "#bae6fd", 0.6),
                ),
                attack(
                    "tempest-halo",
                    "Tempest Halo",
                    15,
                    0.45,
                    "A ring of cutting gusts.",
                    fx(Ring, "#38bdf8", "#5eead4", 0.65),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "abyssaur",
            name: "Abyssaur",
            description: "A massive and peaceful sea monster.",
            color: "#1d4ed8",
            base_stats: Stats::new(5, 15, 12, 10, 8),
            attacks: vec![
                attack(
                    "abyss-crash",
                    "Abyss Crash",
                    11,
                    0.85,
                    "Strikes with the weight of the ocean.",
                    fx(Wave, "#1d4ed8", "#93c5fd", 0.6),
                ),
                attack(
                    "pressure-wave",
                    "Pressure Wave",
                    14,
                    0.6,
                    "Compresses water into a violent impact.",
                    fx(Beam, "#2563eb", "#0ea5e9", 0.6),
                ),
                attack(
                    "depth-quake",
                    "Depth Quake",
                    18,
                    0.4,
                    "Makes the deep tremble.",
                    fx(Quake, "#1e3a8a", "#38bdf8", 0.75),
                ),
            ],
            evolutions: Vec::new(),
        },
        // -- bosses ----------------------------------------------------------
        SpeciesDefinition {
            id: "brasemire",
            name: "Brasemire",
            description: "Guardian of the ember clearing, wreathed in smoke.",
            color: "#dc2626",
            base_stats: Stats::new(4, 8, 6, 5, 7),
            attacks: vec![
                attack(
                    "smoke-bite",
                    "Smoke Bite",
                    4,
                    0.85,
                    "A sooty snap of the jaws.",
                    fx(Dash, "#7f1d1d", "#f97316", 0.45),
                ),
                attack(
                    "ember-rain",
                    "Ember Rain",
                    6,
                    0.6,
                    "Glowing cinders fall from above.",
                    fx(Meteor, "#dc2626", "#fde68a", 0.65),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "embermaw",
            name: "Embermaw",
            description: "A hulking maw of living coal.",
            color: "#b45309",
            base_stats: Stats::new(6, 10, 8, 4, 8),
            attacks: vec![
                attack(
                    "coal-crush",
                    "Coal Crush",
                    5,
                    0.8,
                    "Slams down with burning weight.",
                    fx(Quake, "#78350f", "#f59e0b", 0.6),
                ),
                attack(
                    "furnace-breath",
                    "Furnace Breath",
                    8,
                    0.5,
                    "A long gout of heat.",
                    fx(Beam, "#f59e0b", "#fef3c7", 0.6),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "azureAlpha",
            name: "Azure Alpha",
            description: "Leader of the gorge pack, quick as a current.",
            color: "#0ea5e9",
            base_stats: Stats::new(7, 10, 7, 12, 9),
            attacks: vec![
                attack(
                    "riptide-fang",
                    "Riptide Fang",
                    5,
                    0.85,
                    "A lunging bite that drags the foe.",
                    fx(Slash, "#0ea5e9", "#bae6fd", 0.45),
                ),
                attack(
                    "spray-howl",
                    "Spray Howl",
                    7,
                    0.6,
                    "A howl that hurls stinging spray.",
                    fx(Wave, "#0284c7", "#7dd3fc", 0.6),
                ),
            ],
            evolutions: Vec::new(),
        },
        SpeciesDefinition {
            id: "azureOmega",
            name: "Azure Omega",
            description: "The alpha's twin, patient and heavy-jawed.",
            color: "#1e40af",
            base_stats: Stats::new(7, 11, 9, 9, 9),
            attacks: vec![
                attack(
                    "undertow-fang",
                    "Undertow Fang",
                    6,
                    0.8,
                    "A crushing bite from below.",
                    fx(Slash, "#1e40af", "#93c5fd", 0.5),
                ),
                attack(
                    "deep-howl",
                    "Deep Howl",
                    8,
                    0.55,
                    "A resonant howl that rattles bones.",
                    fx(Pulse, "#1e3a8a", "#60a5fa", 0.6),
                ),
            ],
            evolutions: Vec::new(),
        },
    ]
}
