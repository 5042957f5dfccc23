/// Package identifier, unique within one catalog.
/// Examples: `vim`, `gimp`, `libreoffice-writer`
pub type ItemId = String;
/// Index vocabulary term, carrying an optional class prefix.
/// Examples: `XTrole::program`, `XPvim`, `editor`
pub type Term = String;
/// Document identifier assigned by a search index.
/// Example: `42`
pub type DocId = u32;
/// User identifier, explicit or randomly drawn at construction.
/// Example: `0x4f2a_91cc_03de_7b18_55aa_60e4_1f09_c837`
pub type UserId = u128;
/// Demographic label attached to a user profile.
/// Examples: `desktop`, `devel`, `science`
pub type DemographicTag = String;
