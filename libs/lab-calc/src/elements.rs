//! Periodic table reference data used by the formula tools

/// A chemical element with its standard atomic mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Standard atomic mass in g/mol
    pub atomic_mass: f64,
}

const fn el(
    atomic_number: u8,
    symbol: &'static str,
    name: &'static str,
    atomic_mass: f64,
) -> Element {
    Element {
        atomic_number,
        symbol,
        name,
        atomic_mass,
    }
}

/// Elements 1–86 (H through Rn)
pub static ELEMENTS: [Element; 86] = [
    el(1, "H", "Hydrogen", 1.008),
    el(2, "He", "Helium", 4.003),
    el(3, "Li", "Lithium", 6.941),
    el(4, "Be", "Beryllium", 9.012),
    el(5, "B", "Boron", 10.811),
    el(6, "C", "Carbon", 12.011),
    el(7, "N", "Nitrogen", 14.007),
    el(8, "O", "Oxygen", 15.999),
    el(9, "F", "Fluorine", 18.998),
    el(10, "Ne", "Neon", 20.180),
    el(11, "Na", "Sodium", 22.990),
    el(12, "Mg", "Magnesium", 24.305),
    el(13, "Al", "Aluminium", 26.982),
    el(14, "Si", "Silicon", 28.086),
    el(15, "P", "Phosphorus", 30.974),
    el(16, "S", "Sulfur", 32.065),
    el(17, "Cl", "Chlorine", 35.453),
    el(18, "Ar", "Argon", 39.948),
    el(19, "K", "Potassium", 39.098),
    el(20, "Ca", "Calcium", 40.078),
    el(21, "Sc", "Scandium", 44.956),
    el(22, "Ti", "Titanium", 47.867),
    el(23, "V", "Vanadium", 50.942),
    el(24, "Cr", "Chromium", 51.996),
    el(25, "Mn", "Manganese", 54.938),
    el(26, "Fe", "Iron", 55.845),
    el(27, "Co", "Cobalt", 58.933),
    el(28, "Ni", "Nickel", 58.693),
    el(29, "Cu", "Copper", 63.546),
    el(30, "Zn", "Zinc", 65.380),
    el(31, "Ga", "Gallium", 69.723),
    el(32, "Ge", "Germanium", 72.630),
    el(33, "As", "Arsenic", 74.922),
    el(34, "Se", "Selenium", 78.971),
    el(35, "Br", "Bromine", 79.904),
    el(36, "Kr", "Krypton", 83.798),
    el(37, "Rb", "Rubidium", 85.468),
    el(38, "Sr", "Strontium", 87.620),
    el(39, "Y", "Yttrium", 88.906),
    el(40, "Zr", "Zirconium", 91.224),
    el(41, "Nb", "Niobium", 92.906),
    el(42, "Mo", "Molybdenum", 95.950),
    el(43, "Tc", "Technetium", 98.000),
    el(44, "Ru", "Ruthenium", 101.070),
    el(45, "Rh", "Rhodium", 102.906),
    el(46, "Pd", "Palladium", 106.420),
    el(47, "Ag", "Silver", 107.868),
    el(48, "Cd", "Cadmium", 112.414),
    el(49, "In", "Indium", 114.818),
    el(50, "Sn", "Tin", 118.710),
    el(51, "Sb", "Antimony", 121.760),
    el(52, "Te", "Tellurium", 127.600),
    el(53, "I", "Iodine", 126.904),
    el(54, "Xe", "Xenon", 131.293),
    el(55, "Cs", "Caesium", 132.905),
    el(56, "Ba", "Barium", 137.327),
    el(57, "La", "Lanthanum", 138.905),
    el(58, "Ce", "Cerium", 140.116),
    el(59, "Pr", "Praseodymium", 140.908),
    el(60, "Nd", "Neodymium", 144.242),
    el(61, "Pm", "Promethium", 145.000),
    el(62, "Sm", "Samarium", 150.360),
    el(63, "Eu", "Europium", 151.964),
    el(64, "Gd", "Gadolinium", 157.250),
    el(65, "Tb", "Terbium", 158.925),
    el(66, "Dy", "Dysprosium", 162.500),
    el(67, "Ho", "Holmium", 164.930),
    el(68, "Er", "Erbium", 167.259),
    el(69, "Tm", "Thulium", 168.934),
    el(70, "Yb", "Ytterbium", 173.045),
    el(71, "Lu", "Lutetium", 174.967),
    el(72, "Hf", "Hafnium", 178.490),
    el(73, "Ta", "Tantalum", 180.948),
    el(74, "W", "Tungsten", 183.840),
    el(75, "Re", "Rhenium", 186.207),
    el(76, "Os", "Osmium", 190.230),
    el(77, "Ir", "Iridium", 192.217),
    el(78, "Pt", "Platinum", 195.084),
    el(79, "Au", "Gold", 196.967),
    el(80, "Hg", "Mercury", 200.592),
    el(81, "Tl", "Thallium", 204.383),
    el(82, "Pb", "Lead", 207.200),
    el(83, "Bi", "Bismuth", 208.980),
    el(84, "Po", "Polonium", 209.000),
    el(85, "At", "Astatine", 210.000),
    el(86, "Rn", "Radon", 222.000),
];

/// Look up an element by its exact (case-sensitive) symbol
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Atomic mass for a symbol, if the element is in the table
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    by_symbol(symbol).map(|e| e.atomic_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered() {
        for (i, element) in ELEMENTS.iter().enumerate() {
            assert_eq!(element.atomic_number as usize, i + 1);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(atomic_mass("O"), Some(15.999));
        assert_eq!(by_symbol("Na").map(|e| e.name), Some("Sodium"));
        assert!(by_symbol("na").is_none());
        assert!(by_symbol("Xx").is_none());
        assert_eq!(by_symbol("Rn").map(|e| e.atomic_number), Some(86));
    }

    #[test]
    fn test_symbols_are_unique() {
        let symbols: std::collections::BTreeSet<&str> = ELEMENTS.iter().map(|e| e.symbol).collect();
        assert_eq!(symbols.len(), ELEMENTS.len());
    }
}
