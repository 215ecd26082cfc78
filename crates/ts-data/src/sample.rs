//! Built-in dataset of historical operating systems

use ts_core::{Category, EntityRecord, RelationKind, RelationshipRecord};

use crate::sources::DatasetSource;
use crate::{DataError, Dataset};

struct SampleEntity {
    id: &'static str,
    name: &'static str,
    year: i32,
    category: Category,
    company: &'static str,
    description: &'static str,
    key_persons: &'static [&'static str],
}

const ENTITIES: &[SampleEntity] = &[
    SampleEntity {
        id: "os360",
        name: "OS/360",
        year: 1966,
        category: Category::Mainframe,
        company: "IBM",
        description: "Batch operating system for the System/360 family",
        key_persons: &["Fred Brooks"],
    },
    SampleEntity {
        id: "multics",
        name: "Multics",
        year: 1969,
        category: Category::Mainframe,
        company: "MIT, GE, Bell Labs",
        description: "Time-sharing system with a hierarchical file system",
        key_persons: &["Fernando Corbato"],
    },
    SampleEntity {
        id: "unix",
        name: "Unix",
        year: 1971,
        category: Category::Server,
        company: "Bell Labs",
        description: "Portable multi-user system written in C",
        key_persons: &["Ken Thompson", "Dennis Ritchie"],
    },
    SampleEntity {
        id: "cpm",
        name: "CP/M",
        year: 1974,
        category: Category::Personal,
        company: "Digital Research",
        description: "Disk operating system for 8-bit microcomputers",
        key_persons: &["Gary Kildall"],
    },
    SampleEntity {
        id: "bsd",
        name: "BSD",
        year: 1977,
        category: Category::Server,
        company: "UC Berkeley",
        description: "Berkeley distribution of Unix with TCP/IP networking",
        key_persons: &["Bill Joy"],
    },
    SampleEntity {
        id: "vms",
        name: "VMS",
        year: 1977,
        category: Category::Mainframe,
        company: "DEC",
        description: "Virtual memory system for the VAX line",
        key_persons: &["Dave Cutler"],
    },
    SampleEntity {
        id: "msdos",
        name: "MS-DOS",
        year: 1981,
        category: Category::Personal,
        company: "Microsoft",
        description: "Command-line system of the IBM PC era",
        key_persons: &["Tim Paterson"],
    },
    SampleEntity {
        id: "macos",
        name: "Mac OS",
        year: 1984,
        category: Category::Personal,
        company: "Apple",
        description: "Graphical desktop with a mouse-driven interface",
        key_persons: &["Andy Hertzfeld", "Bill Atkinson"],
    },
    SampleEntity {
        id: "windows",
        name: "Windows",
        year: 1985,
        category: Category::Personal,
        company: "Microsoft",
        description: "Graphical shell that grew into a full system",
        key_persons: &["Bill Gates"],
    },
    SampleEntity {
        id: "minix",
        name: "MINIX",
        year: 1987,
        category: Category::Personal,
        company: "Vrije Universiteit",
        description: "Teaching microkernel system",
        key_persons: &["Andrew Tanenbaum"],
    },
    SampleEntity {
        id: "nextstep",
        name: "NeXTSTEP",
        year: 1989,
        category: Category::Personal,
        company: "NeXT",
        description: "Object-oriented system built on Mach and BSD",
        key_persons: &["Steve Jobs", "Avie Tevanian"],
    },
    SampleEntity {
        id: "linux",
        name: "Linux",
        year: 1991,
        category: Category::Server,
        company: "Community",
        description: "Free Unix-like kernel",
        key_persons: &["Linus Torvalds"],
    },
    SampleEntity {
        id: "windowsnt",
        name: "Windows NT",
        year: 1993,
        category: Category::Server,
        company: "Microsoft",
        description: "Portable 32-bit kernel with a VMS heritage",
        key_persons: &["Dave Cutler"],
    },
    SampleEntity {
        id: "palmos",
        name: "Palm OS",
        year: 1996,
        category: Category::Mobile,
        company: "Palm",
        description: "Handheld system for personal digital assistants",
        key_persons: &["Jeff Hawkins"],
    },
    SampleEntity {
        id: "vxworks",
        name: "VxWorks",
        year: 1987,
        category: Category::Embedded,
        company: "Wind River",
        description: "Real-time system for embedded devices",
        key_persons: &["Jerry Fiddler"],
    },
    SampleEntity {
        id: "symbian",
        name: "Symbian",
        year: 1998,
        category: Category::Mobile,
        company: "Symbian Ltd",
        description: "Smartphone system derived from EPOC",
        key_persons: &["David Potter"],
    },
    SampleEntity {
        id: "macosx",
        name: "Mac OS X",
        year: 2001,
        category: Category::Personal,
        company: "Apple",
        description: "Unix-based successor to classic Mac OS",
        key_persons: &["Avie Tevanian"],
    },
    SampleEntity {
        id: "ios",
        name: "iOS",
        year: 2007,
        category: Category::Mobile,
        company: "Apple",
        description: "Touch-first system derived from Mac OS X",
        key_persons: &["Scott Forstall"],
    },
    SampleEntity {
        id: "android",
        name: "Android",
        year: 2008,
        category: Category::Mobile,
        company: "Google",
        description: "Linux-based mobile platform",
        key_persons: &["Andy Rubin"],
    },
];

const RELATIONSHIPS: &[(&str, &str, RelationKind, f64)] = &[
    ("os360", "multics", RelationKind::Inspiration, 0.4),
    ("multics", "unix", RelationKind::Inspiration, 0.9),
    ("unix", "bsd", RelationKind::Evolution, 0.9),
    ("unix", "minix", RelationKind::Influence, 0.7),
    ("unix", "linux", RelationKind::Influence, 0.8),
    ("unix", "vxworks", RelationKind::Influence, 0.3),
    ("cpm", "msdos", RelationKind::Influence, 0.8),
    ("msdos", "windows", RelationKind::Evolution, 0.7),
    ("macos", "windows", RelationKind::Inspiration, 0.6),
    ("vms", "windowsnt", RelationKind::Influence, 0.8),
    ("windows", "windowsnt", RelationKind::Evolution, 0.5),
    ("bsd", "nextstep", RelationKind::Evolution, 0.7),
    ("minix", "linux", RelationKind::Inspiration, 0.6),
    ("nextstep", "macosx", RelationKind::Evolution, 0.9),
    ("macos", "macosx", RelationKind::Evolution, 0.6),
    ("bsd", "macosx", RelationKind::Influence, 0.7),
    ("palmos", "ios", RelationKind::Inspiration, 0.3),
    ("symbian", "android", RelationKind::Inspiration, 0.3),
    ("macosx", "ios", RelationKind::Evolution, 0.9),
    ("linux", "android", RelationKind::Evolution, 0.8),
];

/// Records of the built-in dataset
pub fn sample_dataset() -> Dataset {
    let entities = ENTITIES
        .iter()
        .map(|e| EntityRecord {
            description: Some(e.description.to_string()),
            company: Some(e.company.to_string()),
            key_persons: e.key_persons.iter().map(|p| p.to_string()).collect(),
            ..EntityRecord::new(e.id, e.name, e.year, e.category)
        })
        .collect();
    let relationships = RELATIONSHIPS
        .iter()
        .map(|&(from, to, kind, strength)| RelationshipRecord::new(from, to, kind, strength))
        .collect();
    Dataset {
        entities,
        relationships,
    }
}

/// [`DatasetSource`] over the built-in dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl DatasetSource for SampleSource {
    fn name(&self) -> String {
        "sample".to_string()
    }

    fn load(&self) -> Result<Dataset, DataError> {
        Ok(sample_dataset())
    }
}
