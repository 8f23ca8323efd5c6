/// 2x2 coefficient block, `m[actor_subtype][target_subtype]`.
pub type Matrix2 = [[f32; 2]; 2];

/// A colony's genome: the forces it feels toward its own kind and toward the enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct ColonyDna {
    pub name: String,
    /// Free-text strategy summary, as proposed by whoever evolved this DNA.
    pub strategy: String,
    /// Coefficients toward the colony's own subtypes.
    pub internal: Matrix2,
    /// Coefficients toward the opposing colony's subtypes.
    pub external: Matrix2,
    /// RGBA packed as u32, one per subtype.
    pub palette: [u32; 2],
}

impl ColonyDna {
    /// Default first colony: balanced.
    pub fn cyan_swarm() -> Self {
        Self {
            name: "Cyan Swarm".to_string(),
            strategy: "Balanced standard configuration".to_string(),
            internal: [[0.5, -0.2], [0.1, 1.0]],
            external: [[0.6, -0.5], [0.3, -0.8]],
            palette: [0x00FFFFFF, 0x0088FFFF],
        }
    }

    /// Default second colony: close-range brawlers.
    pub fn crimson_legion() -> Self {
        Self {
            name: "Crimson Legion".to_string(),
            strategy: "Aggressive close-range combat".to_string(),
            internal: [[0.8, 0.1], [-0.1, 0.5]],
            external: [[0.8, 0.2], [-0.5, -1.0]],
            palette: [0xFF4400FF, 0xFFAA00FF],
        }
    }

    /// All-zero coefficients. Nothing attracts or repels beyond the contact push.
    pub fn neutral(name: &str) -> Self {
        Self {
            name: name.to_string(),
            strategy: String::new(),
            internal: [[0.0; 2]; 2],
            external: [[0.0; 2]; 2],
            palette: [0xFFFFFFFF, 0xAAAAAAFF],
        }
    }

    /// Procedural opponent. `index` picks the name parts and palette so a pool
    /// built from `0..n` has distinct members.
    pub fn random(rng: &mut fastrand::Rng, index: usize) -> Self {
        let aggressive = rng.bool();
        let clumper = rng.bool();

        let cohesion = |rng: &mut fastrand::Rng| {
            if clumper {
                range(rng, 0.5, 1.0)
            } else {
                range(rng, -0.2, 0.5)
            }
        };
        let attack = |rng: &mut fastrand::Rng| {
            if aggressive {
                range(rng, 0.5, 1.0)
            } else {
                range(rng, -1.0, 0.5)
            }
        };

        let internal = [
            [cohesion(rng), range(rng, -0.5, 0.5)],
            [range(rng, -0.5, 0.5), cohesion(rng)],
        ];
        let external = [
            [attack(rng), range(rng, -1.0, 1.0)],
            [range(rng, -1.0, 1.0), attack(rng)],
        ];

        Self {
            name: generate_name(rng, index),
            strategy: if aggressive {
                "Initial Aggressive Protocol".to_string()
            } else {
                "Initial Defensive Cluster".to_string()
            },
            internal,
            external,
            palette: PALETTES[index % PALETTES.len()],
        }
    }
}

const PREFIXES: &[&str] = &[
    "Neo", "Cyber", "Void", "Quantum", "Mech", "Bio", "Nano", "Flux", "Zero", "Dark", "Solar",
    "Lunar", "Hyper", "Techno", "Iron", "Steel", "Plasma", "Aero", "Terra", "Exo",
];
const SUFFIXES: &[&str] = &[
    "Swarm", "Core", "Mind", "Grid", "Unit", "Legion", "Horde", "System", "Virus", "Nexus",
    "Wraith", "Titan", "Phantom", "Spark", "Storm", "Viper", "Matrix", "Reaper", "Ghost", "Pulse",
];
const PALETTES: &[[u32; 2]] = &[
    [0xA855F7FF, 0xD8B4FEFF], // purple
    [0x22C55EFF, 0x86EFACFF], // green
    [0xEAB308FF, 0xFDE047FF], // yellow
    [0xEF4444FF, 0xFCA5A5FF], // red
    [0x3B82F6FF, 0x93C5FDFF], // blue
    [0xF97316FF, 0xFDBA74FF], // orange
    [0xEC4899FF, 0xFBCFE8FF], // pink
    [0x14B8A6FF, 0x5EEAD4FF], // teal
];

fn range(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}

/// "Prefix Suffix vX.Y"; the suffix index is scrambled so neighbours differ.
fn generate_name(rng: &mut fastrand::Rng, index: usize) -> String {
    format!(
        "{} {} v{}.{}",
        PREFIXES[index % PREFIXES.len()],
        SUFFIXES[(index * 3) % SUFFIXES.len()],
        rng.u8(0..9),
        rng.u8(0..9),
    )
}
