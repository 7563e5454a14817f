//! Attribute keys and enumerated attribute values.
//!
//! Every enumerated attribute domain carries an `Unknown` sentinel as its
//! first variant; accessors substitute it when an attribute is absent so
//! rule handlers never have to deal with missing values.

/// Attribute keys (S-57 attribute acronyms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Att {
    ObjNam,
    Colour,
    ColPat,
    BcnShp,
    BoyShp,
    TopShp,
    CatLam,
    CatAch,
    CatSea,
    CatWed,
    CatMor,
    CatObs,
    CatWrk,
    CatLmk,
    Functn,
    CatScf,
    CatHaf,
    CatSil,
    CatCrn,
    CatSit,
    CatSiw,
    CatPil,
    CatOfp,
    CatRod,
    CatPip,
    CatCbl,
    CatDis,
    CatOpa,
    CatRea,
    CatVan,
    CatSlc,
    CatNmk,
    CatLit,
    NatSur,
    NatQua,
    Status,
    TecSou,
    ValSou,
    Drval2,
    WatLev,
    Trafic,
    Orient,
    ComCha,
    Radius,
    Hunits,
    WtwDis,
    HorClr,
    VerClr,
    VerCsa,
    VerCcl,
    VerCop,
    MarSys,
    BnkWtw,
    AddMrk,
}

/// Enumerated attribute domain: a closed value set with an unknown
/// sentinel, convertible to and from the type-erased [`EnumVal`].
pub trait AttrEnum:
    Copy + PartialEq + Into<EnumVal> + TryFrom<EnumVal> + std::fmt::Debug
{
    const UNKNOWN: Self;
}

macro_rules! att_enums {
    ($($(#[$meta:meta])* $name:ident { $($var:ident),* $(,)? })*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $name {
                Unknown,
                $($var),*
            }

            impl AttrEnum for $name {
                const UNKNOWN: Self = $name::Unknown;
            }

            impl From<$name> for EnumVal {
                fn from(v: $name) -> Self {
                    EnumVal::$name(v)
                }
            }

            impl TryFrom<EnumVal> for $name {
                type Error = ();

                fn try_from(v: EnumVal) -> Result<Self, ()> {
                    match v {
                        EnumVal::$name(x) => Ok(x),
                        _ => Err(()),
                    }
                }
            }
        )*

        /// A type-erased enumerated attribute token, tagged by its domain.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EnumVal {
            $($name($name)),*
        }
    };
}

att_enums! {
    /// Buoy shape (BOYSHP).
    BoyShp { Conical, Can, Spherical, Pillar, Spar, Barrel, Super, Ice }

    /// Beacon shape (BCNSHP).
    BcnShp { Stake, Withy, Tower, Lattice, Pile, Cairn, Buoyant, Pole, Perch, Post }

    /// Topmark/daymark shape (TOPSHP).
    TopShp {
        Cone, TwoCones, Sphere, TwoSpheres, Cylinder, Board, XShape,
        UprightCross, Cube, Rhombus, Circle, Square, TriangleUp,
        TriangleDown, Flag, Besom, BesomDown
    }

    /// Body colour (COLOUR).
    Colour {
        White, Black, Red, Green, Blue, Yellow, Grey, Brown, Amber,
        Violet, Orange, Magenta, Pink
    }

    /// Colour pattern (COLPAT).
    ColPat { Horizontal, Vertical, Diagonal, Border, Squared, Cross, Saltire, Stripes }

    /// Lateral mark category (CATLAM).
    CatLam { Port, Starboard, ChannelRight, ChannelLeft }

    /// Anchorage category (CATACH).
    CatAch {
        DeepWater, Tanker, H24, Explosives, Quarantine, Seaplane,
        SmallCraft, SmallCraftMooring
    }

    /// Sea area category (CATSEA).
    CatSea { Reach, Bay, Shoal, Gat, Narrows }

    /// Weed/kelp category (CATWED).
    CatWed { Kelp, Seaweed, SeaGrass, Sargasso }

    /// Mooring facility category (CATMOR).
    CatMor { Dolphin, DeviationDolphin, Bollard, Post, Buoy }

    /// Obstruction category (CATOBS).
    CatObs { Boom, FoulGround, Stump, Snag, Wellhead, GroundTackle }

    /// Wreck category (CATWRK).
    CatWrk { NonDangerous, Dangerous, Distributed, MastsShowing, HullShowing }

    /// Landmark category (CATLMK).
    CatLmk {
        Cairn, Chimney, Dish, Flagstaff, Mast, Monument, Column,
        Obelisk, Statue, Cross, Dome, Radar, Tower, Windmill, Spire
    }

    /// Building/landmark function (FUNCTN).
    FncFnc { Church, Chapel, Temple, Mosque, Lookout, Light, Communication }

    /// Small craft facility category (CATSCF).
    CatScf {
        VisitorBerth, Slipway, Chandler, Provisions, Boatyard, BoatHoist,
        PumpOut, Showers, Laundrette, Fuel, Water, Electricity, Toilets
    }

    /// Harbour facility category (CATHAF).
    CatHaf { Marina, MarinaNoFacilities, Fishing, RoRo, Ferry }

    /// Silo/tank category (CATSIL).
    CatSil { Silo, Tank, Grain, WaterTower }

    /// Crane category (CATCRN).
    CatCrn { Container, Sheerlegs, Travelling, AFrame, Goliath }

    /// Signal station traffic category (CATSIT).
    CatSit { International, Traffic, PortControl, Lock, Bridge }

    /// Signal station warning category (CATSIW).
    CatSiw {
        Storm, Weather, Ice, TideGauge, TideScale, Tide, Stream, Danger,
        Military, Time
    }

    /// Pilot boarding place category (CATPIL).
    CatPil { Boarding, Helicopter, FromShore }

    /// Offshore platform category (CATOFP).
    CatOfp { Oil, Production, Observation, Mooring, ArtificialIsland, Fpso, Accommodation }

    /// Road category (CATROD).
    CatRod { Motorway, Major, Minor, Track }

    /// Pipeline category (CATPIP).
    CatPip { Outfall, Intake, Sewer, Bubbler, Supply }

    /// Cable category (CATCBL).
    CatCbl { Power, Telephone, Transmission, MooringCable }

    /// Distance mark category (CATDIS).
    CatDis { Installed, NotInstalled }

    /// Production area category (CATOPA).
    CatOpa { WindFarm, Solar, Wave, Current }

    /// Restricted area category (CATREA).
    CatRea { NoWake, Safety, NoAnchoring, NoFishing, Nature }

    /// Virtual AIS aid category (CATVAN).
    CatVan {
        NorthCardinal, SouthCardinal, EastCardinal, WestCardinal,
        PortLateral, StarboardLateral, PreferredPort, PreferredStarboard,
        IsolatedDanger, SafeWater, SpecialPurpose, Wreck
    }

    /// Shoreline construction category (CATSLC).
    CatSlc {
        Breakwater, Groyne, Mole, Pier, Wharf, TrainingWall, Ramp,
        Slipway, Fender
    }

    /// Notice mark category (CATNMK).
    CatNmk {
        NoEntry, NoOvertaking, NoAnchoring, NoMooring, SpeedLimit,
        SoundHorn, Attention, Stop
    }

    /// Light category (CATLIT).
    CatLit {
        Directional, Leading, Aero, AirObstruction, FogDetector,
        Floodlight, Strip, Subsidiary, Front, Rear
    }

    /// Seabed surface material (NATSUR).
    NatSur {
        Mud, Clay, Silt, Sand, Stone, Gravel, Pebbles, Cobbles, Rock,
        Lava, Coral, Shells, Boulders
    }

    /// Seabed surface quality (NATQUA).
    NatQua {
        Fine, Medium, Coarse, Broken, Sticky, Soft, Stiff, Volcanic,
        Calcareous, Hard
    }

    /// Status (STATUS).
    StsSts {
        Permanent, Occasional, Recommended, NotInUse, Illuminated,
        Reserved, Temporary, Private
    }

    /// Sounding technique (TECSOU).
    TecSou { EchoSounder, SideScan, MultiBeam, Diver, LeadLine, Computed }

    /// Traffic flow (TRAFIC).
    TrfTrf { Inbound, Outbound, OneWay, TwoWay }

    /// Horizontal length unit (HUNITS).
    UniHlu { Metres, Feet, Kilometres, Hectometres, StatuteMiles, NauticalMiles }

    /// Water level effect (WATLEV).
    WatLev {
        PartlySubmerged, AlwaysDry, Submerged, CoversUncovers, Awash,
        Floating
    }

    /// Buoyage system (MARSYS).
    MarSys { IalaA, IalaB, Cevn, NoSystem, Other }

    /// Waterway bank (BNKWTW).
    BnkWtw { Left, Right }

    /// Additional notice marker (ADDMRK).
    AddMrk { TopBoard, BottomBoard, RightTriangle, LeftTriangle, BottomTriangle }
}

/// One attribute value: single string, single number, or an ordered list
/// of enumerated tokens (multi-valued attributes, e.g. buoy colours).
#[derive(Debug, Clone, PartialEq)]
pub enum AttVal {
    Str(String),
    Num(f64),
    Enums(Vec<EnumVal>),
}

impl AttVal {
    /// Convenience constructor for a single enumerated token.
    pub fn one<T: AttrEnum>(v: T) -> Self {
        AttVal::Enums(vec![v.into()])
    }

    /// Convenience constructor for a token list.
    pub fn list<T: AttrEnum>(vs: impl IntoIterator<Item = T>) -> Self {
        AttVal::Enums(vs.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttVal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            AttVal::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_enums(&self) -> Option<&[EnumVal]> {
        match self {
            AttVal::Enums(vs) => Some(vs),
            _ => None,
        }
    }

    /// Equality/containment test tolerant of the three value shapes:
    /// string equality, numeric equality, or list containment.
    pub fn matches(&self, probe: &AttVal) -> bool {
        match (self, probe) {
            (AttVal::Str(a), AttVal::Str(b)) => a == b,
            (AttVal::Num(a), AttVal::Num(b)) => a == b,
            (AttVal::Enums(list), AttVal::Enums(probe)) => {
                probe.iter().all(|p| list.contains(p))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_first_variant() {
        assert_eq!(BoyShp::UNKNOWN, BoyShp::Unknown);
        assert_eq!(Colour::UNKNOWN, Colour::Unknown);
    }

    #[test]
    fn test_enum_val_round_trip() {
        let v: EnumVal = BoyShp::Pillar.into();
        assert_eq!(BoyShp::try_from(v), Ok(BoyShp::Pillar));
        assert!(BcnShp::try_from(v).is_err());
    }

    #[test]
    fn test_matches_list_containment() {
        let colours = AttVal::list([Colour::Red, Colour::White]);
        assert!(colours.matches(&AttVal::one(Colour::Red)));
        assert!(!colours.matches(&AttVal::one(Colour::Green)));
        assert!(!colours.matches(&AttVal::Num(1.0)));
    }

    #[test]
    fn test_matches_scalars() {
        assert!(AttVal::Str("Ch.16".into()).matches(&AttVal::Str("Ch.16".into())));
        assert!(AttVal::Num(5.5).matches(&AttVal::Num(5.5)));
        assert!(!AttVal::Num(5.5).matches(&AttVal::Num(5.6)));
    }
}
