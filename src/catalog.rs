//! Study units: notes plus prior-year questions used as generation input.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub notes: String,
    pub prior_questions: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, notes: impl Into<String>, prior_questions: impl Into<String>) -> Self {
        Self { name: name.into(), notes: notes.into(), prior_questions: prior_questions.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: Vec<Unit>,
}

impl UnitCatalog {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// The cell biology units shipped with the application.
    pub fn builtin() -> Self {
        Self::new(vec![
            Unit::new("Membrane Structure", MEMBRANE_NOTES, MEMBRANE_PYQS),
            Unit::new("Cell Transport", TRANSPORT_NOTES, TRANSPORT_PYQS),
            Unit::new("Cell Signaling", SIGNALING_NOTES, SIGNALING_PYQS),
        ])
    }

    /// Load units from a JSON array of `{"name", "notes", "prior_questions"}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::CatalogIo { path: path_str.clone(), source })?;
        let units: Vec<Unit> = serde_json::from_str(&content)
            .map_err(|source| ConfigError::CatalogFormat { path: path_str.clone(), source })?;
        info!(path = %path_str, units = units.len(), "Loaded unit catalog");
        Ok(Self::new(units))
    }

    /// Case-insensitive lookup by unit name.
    pub fn get(&self, name: &str) -> Option<&Unit> {
        let name = name.trim();
        self.units.iter().find(|u| u.name.eq_ignore_ascii_case(name))
    }

    pub fn first(&self) -> Option<&Unit> {
        self.units.first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

const MEMBRANE_NOTES: &str = "\
CELL BIOLOGY - MEMBRANE STRUCTURE & FUNCTION

1. Membrane Structure & Models
- Fluid Mosaic Model (1972): proposed by Singer & Nicolson.
- Membrane is a two-dimensional fluid with lateral movement of lipids and proteins.
- Mature RBCs are model systems (RBC ghosts) due to absence of organelles.

2. Lipid Chemistry
- Glycerophospholipids: glycerol backbone, ester bonds
- Sphingolipids: sphingosine backbone, amide bond
- Cardiolipin: inner mitochondrial membrane
- Plasmalogens: ether bond, heart & brain
- Hopanoids: bacterial membrane stabilizers

3. Membrane Fluidity
- Depends on chain length & unsaturation
- Cis double bonds lower Tm (increase fluidity)
- Homeoviscous adaptation in cold organisms

4. Membrane Asymmetry
- Outer leaflet: PC, SM, glycolipids
- Inner leaflet: PE, PS, PI (negative charge)
- Flippase, floppase and scramblase maintain asymmetry

5. Signaling
- PI pathway gives DAG + IP3
- PS exposure marks apoptosis (\"eat me\" signal)
- GM1 ganglioside is the cholera toxin receptor
";

const MEMBRANE_PYQS: &str = "\
1. Fluid mosaic model is applicable to which membranes? (DEC 2007)
2. Which cell is used as a model system for plasma membrane studies? (JUNE 2010)
3. Most common phospholipid in myelin sheath? (DEC 2011)
4. Phosphatidylserine is located where in the plasma membrane? (JUNE 2012)
5. Glycophorin spans membrane how many times? (DEC 2015)
6. Single-chain phospholipids form what structure? (DEC 2018)
7. Unsaturated fatty acids affect melting point how? (JUNE 2001)
8. Change in membrane fluidity is mainly due to what? (DEC 2003)
";

const TRANSPORT_NOTES: &str = "\
CELL BIOLOGY - MEMBRANE TRANSPORT

1. Passive Transport
- Simple diffusion follows the concentration gradient; rate set by Fick's law.
- Facilitated diffusion via carriers (GLUT family) shows saturation kinetics (Km, Vmax).
- Channels (aquaporins, gated ion channels) are faster than carriers and not saturable in the same way.

2. Primary Active Transport
- P-type ATPases (Na+/K+ ATPase, SERCA) form a phosphorylated aspartate intermediate.
- Na+/K+ ATPase: 3 Na+ out, 2 K+ in per ATP; inhibited by ouabain.
- V-type ATPases acidify lysosomes; F-type ATPases synthesize ATP.
- ABC transporters (MDR1, CFTR) use ATP binding and hydrolysis.

3. Secondary Active Transport
- Symport (SGLT1: Na+ with glucose) and antiport (Na+/Ca2+ exchanger).
- Driven by ion gradients established by primary pumps.

4. Vesicular Transport
- Clathrin-mediated endocytosis (LDL receptor), caveolae, macropinocytosis.
- Dynamin pinches off vesicles; COPII (ER to Golgi), COPI (retrograde).

5. Membrane Potential
- Resting potential set mainly by K+ leak channels.
- Nernst and Goldman-Hodgkin-Katz equations predict equilibrium potentials.
";

const TRANSPORT_PYQS: &str = "\
1. Which ATPase forms a phosphorylated intermediate during transport? (JUNE 2011)
2. Ouabain inhibits which transporter? (DEC 2012)
3. Glucose uptake in intestinal epithelium is coupled to which ion? (JUNE 2014)
4. Which protein is defective in cystic fibrosis? (DEC 2016)
5. Transport showing saturation kinetics indicates what mechanism? (JUNE 2017)
6. Resting membrane potential is mainly due to permeability to which ion? (DEC 2019)
";

const SIGNALING_NOTES: &str = "\
CELL BIOLOGY - CELL SIGNALING

1. Receptor Classes
- GPCRs: seven transmembrane helices, coupled to heterotrimeric G proteins.
- Receptor tyrosine kinases dimerize and autophosphorylate on ligand binding.
- Ligand-gated ion channels (nicotinic AChR) and nuclear receptors (steroid hormones).

2. G Protein Signaling
- Gs activates adenylyl cyclase, raising cAMP and activating PKA.
- Gi inhibits adenylyl cyclase; Gq activates phospholipase C-beta.
- Cholera toxin ADP-ribosylates Gs-alpha (locked active); pertussis toxin ADP-ribosylates Gi-alpha.

3. Second Messengers
- PLC cleaves PIP2 into IP3 and DAG.
- IP3 releases Ca2+ from the ER; DAG with Ca2+ activates PKC.
- Nitric oxide activates soluble guanylyl cyclase, producing cGMP.

4. RTK and MAPK Pathway
- Grb2 (SH2 domain) recruits SOS, which activates Ras (GDP to GTP exchange).
- Ras, Raf, MEK, ERK cascade drives proliferation.
- Oncogenic Ras mutations impair GTP hydrolysis.

5. Signal Termination
- GTPase activity of G-alpha, phosphodiesterases degrade cAMP.
- Receptor desensitization by GRKs and arrestins.
";

const SIGNALING_PYQS: &str = "\
1. Cholera toxin modifies which G protein subunit? (DEC 2009)
2. IP3 mobilizes calcium from which compartment? (JUNE 2013)
3. Which adaptor links activated RTKs to Ras? (DEC 2014)
4. Nitric oxide acts through which second messenger? (JUNE 2015)
5. Oncogenic Ras is locked in which state? (DEC 2017)
6. Beta-arrestin is involved in what process? (JUNE 2018)
";
