//! Built-in starter projects.

use crate::error::ProjectError;
use crate::project::model::{Control, ControlKind, ControlState, Pin, PowerSource, Project};

/// Names accepted by [`example`].
pub const EXAMPLE_NAMES: [&str; 3] = ["blink", "traffic-light", "lcd-temperature"];

const BLINK_CODE: &str = "void setup() {
  pinMode(13, OUTPUT);
}

void loop() {
  digitalWrite(13, HIGH);
  delay(1000);
  digitalWrite(13, LOW);
  delay(1000);
}";

const TRAFFIC_LIGHT_CODE: &str = "const int red = 12, yellow = 11, green = 10;

void setup() {
  pinMode(red, OUTPUT); pinMode(yellow, OUTPUT); pinMode(green, OUTPUT);
}

void loop() {
  digitalWrite(red, HIGH); delay(3000); digitalWrite(red, LOW);
  digitalWrite(yellow, HIGH); delay(1000); digitalWrite(yellow, LOW);
  digitalWrite(green, HIGH); delay(3000); digitalWrite(green, LOW);
}";

const LCD_TEMPERATURE_CODE: &str = "#include <Wire.h>
#include <LiquidCrystal_I2C.h>
#include <DHT.h>

DHT dht(2, DHT11);
LiquidCrystal_I2C lcd(0x27, 16, 2);

void setup() {
  dht.begin(); lcd.init(); lcd.backlight();
}

void loop() {
  float h = dht.readHumidity();
  float t = dht.readTemperature();
  lcd.setCursor(0,0); lcd.print(\"Temp: \"); lcd.print(t); lcd.print(\"C\");
  lcd.setCursor(0,1); lcd.print(\"Humidity: \"); lcd.print(h); lcd.print(\"%\");
  delay(2000);
}";

/// Build one of the starter projects by name.
pub fn example(name: &str) -> Result<Project, ProjectError> {
    let project = match name {
        "blink" => Project {
            description: "Blink the on-board LED on pin 13.".into(),
            code: BLINK_CODE.into(),
            wiring: "| Component | Arduino Pin | Notes |\n|---|---|---|\n| LED Built-in | 13 | On board |\n| GND | GND | Ground |".into(),
            controls: vec![output("ex1", 13, "LED Built-in")],
            ..Project::new("example-blink", "01. Basic Blink")
        },
        "traffic-light" => Project {
            description: "Three-LED traffic light cycle.".into(),
            code: TRAFFIC_LIGHT_CODE.into(),
            wiring: "Red: pin 12, Yellow: pin 11, Green: pin 10. Each through a 220 Ohm resistor to GND.".into(),
            controls: vec![
                output("ex2r", 12, "Red Light"),
                output("ex2y", 11, "Yellow Light"),
                output("ex2g", 10, "Green Light"),
            ],
            ..Project::new("example-traffic-light", "02. Traffic Light")
        },
        "lcd-temperature" => Project {
            description: "Read a DHT11 and show it on an I2C LCD.".into(),
            code: LCD_TEMPERATURE_CODE.into(),
            libraries: vec![
                "DHT sensor library".into(),
                "LiquidCrystal I2C".into(),
                "Wire".into(),
            ],
            wiring: "VCC to 5V, GND to GND. DHT data to pin 2. LCD SDA to A4, SCL to A5.".into(),
            controls: vec![Control {
                id: "ex3".into(),
                pin: Pin::Number(2),
                label: "DHT Sensor".into(),
                kind: ControlKind::DigitalInput,
                last_state: ControlState::Switch(false),
                config: None,
            }],
            ..Project::new("example-lcd-temperature", "03. LCD Temperature Monitor")
        },
        other => return Err(ProjectError::UnknownExample(other.to_string())),
    };
    Ok(Project {
        battery_type: PowerSource::default(),
        ..project
    })
}

fn output(id: &str, pin: u32, label: &str) -> Control {
    Control {
        id: id.into(),
        pin: Pin::Number(pin),
        label: label.into(),
        kind: ControlKind::DigitalOutput,
        last_state: ControlState::Switch(false),
        config: None,
    }
}
