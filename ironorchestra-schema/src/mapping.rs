//! FIX datatype to OpenAPI schema type mapping.
//!
//! The mapping is plain configuration data. [`TypeMapping::fix_latest`]
//! builds the table for the FIX Latest datatype catalogue; tests and callers
//! with other catalogues assemble their own with [`TypeMapping::with`].
//!
//! A token missing from the table is treated by the resolver as a code set
//! reference, so every legitimate primitive must be listed here.

use std::collections::HashMap;
use std::fmt;
use OpenApiPrimitive::{Boolean, Number, String as Str};

/// OpenAPI primitive kinds a FIX datatype can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenApiPrimitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

impl OpenApiPrimitive {
    /// Returns the OpenAPI type keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for OpenApiPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema descriptor for one FIX primitive datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaType {
    /// FIX datatype token.
    pub fix_type: String,
    /// OpenAPI primitive kind.
    pub primitive: OpenApiPrimitive,
    /// Description of the FIX datatype.
    pub description: String,
    /// Regular expression constraining string values.
    pub pattern: Option<String>,
    /// OpenAPI format hint (`date-time`, `iso-4217`, ...).
    pub format: Option<String>,
}

impl SchemaType {
    /// Creates a descriptor without pattern or format.
    #[must_use]
    pub fn new(
        fix_type: impl Into<String>,
        primitive: OpenApiPrimitive,
        description: impl Into<String>,
    ) -> Self {
        Self {
            fix_type: fix_type.into(),
            primitive,
            description: description.into(),
            pattern: None,
            format: None,
        }
    }

    /// Sets the string pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the format hint.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Read-only lookup from FIX datatype token to [`SchemaType`].
#[derive(Debug, Clone, Default)]
pub struct TypeMapping {
    types: HashMap<String, SchemaType>,
}

impl TypeMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry keyed by its `fix_type`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, schema_type: SchemaType) -> Self {
        self.types.insert(schema_type.fix_type.clone(), schema_type);
        self
    }

    /// Builds the mapping for the FIX Latest datatype catalogue.
    #[must_use]
    pub fn fix_latest() -> Self {
        FIX_LATEST
            .iter()
            .fold(Self::new(), |mapping, e| mapping.with(e.to_schema_type()))
    }

    /// Looks up a datatype token.
    #[must_use]
    pub fn get(&self, fix_type: &str) -> Option<&SchemaType> {
        self.types.get(fix_type)
    }

    /// Returns true if the token is a mapped primitive.
    #[must_use]
    pub fn contains(&self, fix_type: &str) -> bool {
        self.types.contains_key(fix_type)
    }

    /// Returns the number of mapped datatypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

struct Entry {
    fix_type: &'static str,
    primitive: OpenApiPrimitive,
    description: &'static str,
    pattern: Option<&'static str>,
    format: Option<&'static str>,
}

impl Entry {
    fn to_schema_type(&self) -> SchemaType {
        SchemaType {
            fix_type: self.fix_type.to_string(),
            primitive: self.primitive,
            description: self.description.to_string(),
            pattern: self.pattern.map(str::to_string),
            format: self.format.map(str::to_string),
        }
    }
}

const fn entry(
    fix_type: &'static str,
    primitive: OpenApiPrimitive,
    description: &'static str,
) -> Entry {
    Entry {
        fix_type,
        primitive,
        description,
        pattern: None,
        format: None,
    }
}

const fn string_entry(
    fix_type: &'static str,
    description: &'static str,
    pattern: Option<&'static str>,
    format: Option<&'static str>,
) -> Entry {
    Entry {
        fix_type,
        primitive: OpenApiPrimitive::String,
        description,
        pattern,
        format,
    }
}

// Follows the Zalando RESTful API guidelines for data formats.
const FIX_LATEST: &[Entry] = &[
    entry(
        "int",
        Number,
        "Sequence of digits without commas or decimals and optional sign character (ASCII characters - and 0 - 9 ). The sign character utilizes one byte (i.e. positive int is 99999 while negative int is -99999). Note that int values may contain leading zeros (e.g. 00023 = 23).",
    ),
    entry(
        "Length",
        Number,
        "int field representing the length in bytes. Value must be positive.",
    ),
    entry(
        "TagNum",
        Number,
        "int field representing a field's tag number when using FIX Tag=Value syntax. Value must be positive and may not contain leading zeros.",
    ),
    entry(
        "SeqNum",
        Number,
        "int field representing a message sequence number. Value must be positive.",
    ),
    entry(
        "NumInGroup",
        Number,
        "int field representing the number of entries in a repeating group. Value must be positive.",
    ),
    entry(
        "DayOfMonth",
        Number,
        "int field representing a day during a particular month (values 1 to 31).",
    ),
    entry(
        "float",
        Number,
        "Sequence of digits with optional decimal point and sign character (ASCII characters -, 0 - 9 and .); the absence of the decimal point within the string will be interpreted as the float representation of an integer value. All float fields must accommodate up to fifteen significant digits. The number of decimal places used should be a factor of business/market needs and mutual agreement between counterparties. Note that float values may contain leading zeros (e.g. 00023.23 = 23.23) and may contain or omit trailing zeros after the decimal point (e.g. 23.0 = 23.0000 = 23 = 23.). Note that fields which are derived from float may contain negative values unless explicitly specified otherwise.",
    ),
    entry(
        "Qty",
        Number,
        "float field capable of storing either a whole number (no decimal places) of shares (securities denominated in whole units) or a decimal value containing decimal places for non-share quantity asset classes (securities denominated in fractional units).",
    ),
    entry(
        "Price",
        Number,
        "float field representing a price. Note the number of decimal places may vary. For certain asset classes prices may be negative values. For example, prices for options strategies can be negative under certain market conditions. Refer to Volume 7: FIX Usage by Product for asset classes that support negative price values.",
    ),
    entry(
        "PriceOffset",
        Number,
        "float field representing a price offset, which can be mathematically added to a Price. Note the number of decimal places may vary and some fields such as LastForwardPoints may be negative.",
    ),
    entry(
        "Amt",
        Number,
        "float field typically representing a Price times a Qty",
    ),
    entry(
        "Percentage",
        Number,
        "float field representing a percentage (e.g. 0.05 represents 5% and 0.9525 represents 95.25%). Note the number of decimal places may vary.",
    ),
    string_entry(
        "char",
        "Single character value, can include any alphanumeric character or punctuation except the delimiter. All char fields are case sensitive (i.e. m != M).",
        Some("[a-zA-Z]{1}"),
        None,
    ),
    entry(
        "Boolean",
        Boolean,
        "char field containing one of two values:\n'Y' = True/Yes\n'N' = False/No",
    ),
    entry(
        "String",
        Str,
        "Alpha-numeric free format strings, can include any character or punctuation except the delimiter. All String fields are case sensitive (i.e. morstatt != Morstatt).",
    ),
    entry(
        "MultipleCharValue",
        Str,
        "string field containing one or more space delimited single character values (e.g. |18=2 A F| ).",
    ),
    entry(
        "MultipleStringValue",
        Str,
        "string field containing one or more space delimited multiple character values (e.g. |277=AV AN A| ).",
    ),
    string_entry(
        "Country",
        "string field representing a country using ISO 3166 Country code (2 character) values (see Appendix 6-B).",
        Some("[a-zA-Z]{2}"),
        Some("iso-3166-alpha-2"),
    ),
    string_entry(
        "Currency",
        "string field representing a currency type using ISO 4217 Currency code (3 character) values (see Appendix 6-A).",
        Some("[a-zA-Z]{3}"),
        Some("iso-4217"),
    ),
    entry(
        "Exchange",
        Str,
        "string field representing a market or exchange using ISO 10383 Market Identifier Code (MIC) values (see Appendix 6-C).",
    ),
    entry(
        "MonthYear",
        Str,
        "string field representing month of a year. An optional day of the month can be appended or an optional week code.\nValid formats:\nYYYYMM\nYYYYMMDD\nYYYYMMWW\nValid values:\nYYYY = 0000-9999; MM = 01-12; DD = 01-31; WW = w1, w2, w3, w4, w5.",
    ),
    string_entry(
        "UTCTimestamp",
        "string field representing time/date combination represented in UTC (Universal Time Coordinated, also known as GMT) in either YYYYMMDD-HH:MM:SS (whole seconds) or YYYYMMDD-HH:MM:SS.sss* format, colons, dash, and period required.\nValid values:\nYYYY = 0000-9999, MM = 01-12, DD = 01-31, HH = 00-23, MM = 00-59, SS = 00-60 (60 only if UTC leap second), sss* fractions of seconds.\nThe fractions of seconds may be empty when no fractions of seconds are conveyed (in such a case the period is not conveyed), it may include 3 digits to convey milliseconds, 6 digits to convey microseconds, 9 digits to convey nanoseconds, 12 digits to convey picoseconds; Other number of digits may be used with bilateral agreement.\nLeap Seconds: Note that UTC includes corrections for leap seconds, which are inserted to account for slowing of the rotation of the earth. Leap second insertion is declared by the International Earth Rotation Service (IERS) and has, since 1972, only occurred on the night of Dec. 31 or Jun 30. The IERS considers March 31 and September 30 as secondary dates for leap second insertion, but has never utilized these dates. During a leap second insertion, a UTCTimestamp field may read 19981231-23:59:59, 19981231-23:59:60, 19990101-00:00:00. (see http://tycho.usno.navy.mil/leapsec.html)",
        None,
        Some("date-time"),
    ),
    string_entry(
        "UTCTimeOnly",
        "string field representing time-only represented in UTC (Universal Time Coordinated, also known as GMT) in either HH:MM:SS (whole seconds) or HH:MM:SS.sss* (milliseconds) format, colons, and period required. This special-purpose field is paired with UTCDateOnly to form a proper UTCTimestamp for bandwidth-sensitive messages.\nValid values:\nHH = 00-23, MM = 00-59, SS = 00-60 (60 only if UTC leap second), sss* fractions of seconds. The fractions of seconds may be empty when no fractions of seconds are conveyed (in such a case the period is not conveyed), it may include 3 digits to convey milliseconds, 6 digits to convey microseconds, 9 digits to convey nanoseconds, 12 digits to convey picoseconds; Other number of digits may be used with bilateral agreement.",
        None,
        Some("time"),
    ),
    string_entry(
        "UTCDateOnly",
        "string field representing Date represented in UTC (Universal Time Coordinated, also known as GMT) in YYYYMMDD format. This special-purpose field is paired with UTCTimeOnly to form a proper UTCTimestamp for bandwidth-sensitive messages.\nValid values:\nYYYY = 0000-9999, MM = 01-12, DD = 01-31.",
        None,
        Some("date"),
    ),
    string_entry(
        "LocalMktDate",
        "string field representing a Date of Local Market (as opposed to UTC) in YYYYMMDD format. This is the normal date field used by the FIX Protocol.\nValid values:\nYYYY = 0000-9999, MM = 01-12, DD = 01-31",
        None,
        Some("date"),
    ),
    string_entry(
        "TZTimeOnly",
        "string field representing the time represented based on ISO 8601. This is the time with a UTC offset to allow identification of local time and timezone of that time.\nFormat is HH:MM[:SS][Z | [ + | - hh[:mm]]] where HH = 00-23 hours, MM = 00-59 minutes, SS = 00-59 seconds, hh = 01-12 offset hours, mm = 00-59 offset minutes.",
        None,
        Some("time"),
    ),
    string_entry(
        "TZTimestamp",
        "string field representing a time/date combination representing local time with an offset to UTC to allow identification of local time and timezone offset of that time. The representation is based on ISO 8601.\nFormat is YYYYMMDD-HH:MM:SS.sss*[Z | [ + | - hh[:mm]]] where YYYY = 0000 to 9999, MM = 01-12, DD = 01-31 HH = 00-23 hours, MM = 00-59 minutes, SS = 00-59 seconds, hh = 01-12 offset hours, mm = 00-59 offset minutes, sss* fractions of seconds. The fractions of seconds may be empty when no fractions of seconds are conveyed (in such a case the period is not conveyed), it may include 3 digits to convey milliseconds, 6 digits to convey microseconds, 9 digits to convey nanoseconds, 12 digits to convey picoseconds; Other number of digits may be used with bilateral agreement",
        None,
        Some("date-time"),
    ),
    entry(
        "data",
        Str,
        "string field containing raw data with no format or content restrictions. Data fields are always immediately preceded by a length field. The length field should specify the number of bytes of the value of the data field (up to but not including the terminating SOH).\nCaution: the value of one of these fields may contain the delimiter (SOH) character. Note that the value specified for this field should be followed by the delimiter (SOH) character as all fields are terminated with an SOH.",
    ),
    entry(
        "Pattern",
        Str,
        "Used to build on and provide some restrictions on what is allowed as valid values in fields that uses a base FIX data type and a pattern data type. The universe of allowable valid values for the field would then be the union of the base set of valid values and what is defined by the pattern data type. The pattern data type used by the field will retain its base FIX data type (e.g. String, int, char).",
    ),
    entry(
        "Tenor",
        Str,
        "used to allow the expression of FX standard tenors in addition to the base valid enumerations defined for the field that uses this pattern data type. This pattern data type is defined as follows:\nDx = tenor expression for days, e.g. D5, where x is any integer > 0\nMx = tenor expression for months, e.g. M3, where x is any integer > 0\nWx = tenor expression for weeks, e.g. W13, where x is any integer > 0\nYx = tenor expression for years, e.g. Y1, where x is any integer > 0",
    ),
    entry(
        "Reserved100Plus",
        Str,
        "Values 100 and above are reserved for bilaterally agreed upon user defined enumerations.",
    ),
    entry(
        "Reserved1000Plus",
        Str,
        "Values 1000 and above are reserved for bilaterally agreed upon user defined enumerations.",
    ),
    entry(
        "Reserved4000Plus",
        Str,
        "Values 4000 and above are reserved for bilaterally agreed upon user defined enumerations.",
    ),
    entry(
        "XMLData",
        Str,
        "Contains an XML document raw data with no format or content restrictions. XMLData fields are always immediately preceded by a length field. The length field should specify the number of bytes of the value of the data field (up to but not including the terminating SOH).",
    ),
    string_entry(
        "Language",
        "Identifier for a national language - uses ISO 639-1 standard",
        Some("[a-zA-Z]{2}"),
        Some("iso-639-1"),
    ),
    string_entry(
        "LocalMktTime",
        "string field representing the time local to a particular market center. Used where offset to UTC varies throughout the year and the defining market center is identified in a corresponding field.\nFormat is HH:MM:SS where HH = 00-23 hours, MM = 00-59 minutes, SS = 00-59 seconds. In general only the hour token is non-zero.",
        None,
        Some("time"),
    ),
    entry(
        "XID",
        Str,
        "The purpose of the XID datatype is to define a unique identifier that is global to a FIX message. An identifier defined using this datatype uniquely identifies its containing element, whatever its type and name is. The constraint added by this datatype is that the values of all the fields that have an XID datatype in a FIX message must be unique.",
    ),
    entry(
        "XIDREF",
        Str,
        "The XIDREF datatype defines a reference to an identifier defined by the XID datatype.",
    ),
];
